use crate::query::{parse_pairs, DetachedSpan, Pair, Pairs, ParseError, Rule};
use crate::select::{PathStep, Query, SearchType};

impl Query {
    /// Parses a query like `catalog.book[2]#id`.
    ///
    /// `""` and `"."` are the full document. A `#attr` suffix asks for that attribute's value; otherwise the result is
    /// the targets' subtrees.
    pub fn parse(query_text: &str) -> Result<Self, ParseError> {
        let pairs = parse_pairs(query_text)?;
        Query::try_from(pairs)
    }
}

impl TryFrom<Pairs<'_>> for Query {
    type Error = ParseError;

    fn try_from(pairs: Pairs) -> Result<Self, Self::Error> {
        let mut path = Vec::new();
        let mut search_type = SearchType::SubtreeContent;
        for pair in pairs.flatten() {
            match pair.as_rule() {
                Rule::step => path.push(parse_step(pair)?),
                Rule::attribute => {
                    let name = pair.as_str().trim_start_matches('#');
                    search_type = SearchType::AttributeValue(name.to_string());
                }
                _ => {}
            }
        }
        Ok(Query::new(path, search_type))
    }
}

fn parse_step(pair: Pair) -> Result<PathStep, ParseError> {
    let mut name = "";
    let mut index = None;
    for inner in pair.into_inner().flatten() {
        match inner.as_rule() {
            Rule::name => name = inner.as_str(),
            Rule::index_value => {
                let span = DetachedSpan::from(&inner);
                let value = inner
                    .as_str()
                    .parse::<usize>()
                    .map_err(|err| ParseError::other(span, format!("invalid index: {err}")))?;
                index = Some(value);
            }
            _ => {}
        }
    }
    Ok(PathStep {
        name: name.to_string(),
        index,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::utils_for_test::*;

    fn steps(query: &Query) -> Vec<String> {
        query.path.iter().map(|step| step.to_string()).collect()
    }

    #[test]
    fn full_document() {
        for text in ["", "."] {
            unwrap!(Query::parse(text), Ok(query));
            assert!(query.is_full_document());
            assert_eq!(query.search_type, SearchType::SubtreeContent);
        }
    }

    #[test]
    fn plain_path() {
        unwrap!(Query::parse("catalog.book.title"), Ok(query));
        assert_eq!(steps(&query), vec!["catalog", "book", "title"]);
    }

    #[test]
    fn leading_dot() {
        unwrap!(Query::parse(".a.b"), Ok(query));
        assert_eq!(query.path, vec![PathStep::new("a"), PathStep::new("b")]);
    }

    #[test]
    fn indexes() {
        unwrap!(Query::parse("a[0].b.c[12]"), Ok(query));
        assert_eq!(
            query.path,
            vec![PathStep::indexed("a", 0), PathStep::new("b"), PathStep::indexed("c", 12)]
        );
    }

    #[test]
    fn attribute() {
        unwrap!(Query::parse("a.b[1]#id"), Ok(query));
        assert_eq!(query.path, vec![PathStep::new("a"), PathStep::indexed("b", 1)]);
        assert_eq!(query.search_type, SearchType::AttributeValue("id".to_string()));
    }

    #[test]
    fn names_allow_namespaces_and_dashes() {
        unwrap!(Query::parse("soap:Envelope.my-tag"), Ok(query));
        assert_eq!(steps(&query), vec!["soap:Envelope", "my-tag"]);
    }

    #[test]
    fn display_round_trip() {
        for text in ["a.b[3]#id", "x", "."] {
            unwrap!(Query::parse(text), Ok(query));
            assert_eq!(query.to_string(), text);
        }
    }

    #[test]
    fn attribute_without_path() {
        for text in ["#id", ".#id"] {
            unwrap!(Query::parse(text), Err(_));
        }
    }

    #[test]
    fn malformed() {
        for text in ["a..b", "a[", "a[x]", "a[1", "a b", "a.", "a#", "a#b#c"] {
            unwrap!(Query::parse(text), Err(_));
        }
    }

    #[test]
    fn index_overflow() {
        let text = "a[99999999999999999999999999]";
        unwrap!(Query::parse(text), Err(err));
        let rendered = err.to_string(text);
        assert!(rendered.contains("invalid index"), "{rendered}");
        assert!(rendered.contains('^'), "{rendered}");
    }
}
