use pest::Parser;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "query/grammar.pest"]
struct QueryPairs;

pub(crate) type Pair<'a> = pest::iterators::Pair<'a, Rule>;
pub(crate) type Pairs<'a> = pest::iterators::Pairs<'a, Rule>;

pub(crate) type PestError = pest::error::Error<Rule>;

pub(crate) fn parse_pairs(query_text: &str) -> Result<Pairs, PestError> {
    QueryPairs::parse(Rule::top, query_text).map_err(format_err)
}

fn format_err(err: PestError) -> PestError {
    err.renamed_rules(|rule| {
        match rule {
            Rule::EOI => "end of input",
            Rule::top => "valid query",
            Rule::full_document => "_._",
            Rule::path_query | Rule::path => "path",
            Rule::step => "path step",
            Rule::index => "_[_",
            Rule::index_value => "index",
            Rule::attribute => "_#_",
            Rule::name => "name",
            Rule::name_char => "name character",
        }
        .to_string()
        .replace('_', "\"")
    })
}
