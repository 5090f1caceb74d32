//! Query rendering for the remote query language
//!
//! Translates typed search requests into the vector database's GraphQL
//! dialect. Values are escaped here so caller text can never break out of
//! the rendered query; raw queries bypass rendering entirely and are passed
//! verbatim.

use magicchat_core::{
    Filter, FilterCondition, FilterValue, HybridSearch, KeywordSearch, MagicChatError,
    SearchRequest, SemanticSearch,
};

/// Renderer from typed requests to the remote query language
pub struct GraphQlBuilder;

impl GraphQlBuilder {
    /// Render a validated request into query text.
    ///
    /// Validation failures surface before any rendering; a raw request is
    /// returned verbatim.
    pub fn build(request: &SearchRequest) -> Result<String, MagicChatError> {
        request.validate()?;

        match request {
            SearchRequest::Keyword(search) => Ok(Self::keyword(search)),
            SearchRequest::Semantic(search) => Ok(Self::semantic(search)),
            SearchRequest::Hybrid(search) => Ok(Self::hybrid(search)),
            SearchRequest::Raw(raw) => Ok(raw.query.clone()),
        }
    }

    fn keyword(search: &KeywordSearch) -> String {
        let mut bm25 = format!("bm25: {{query: {}", quote(&search.query));
        if !search.properties.is_empty() {
            bm25.push_str(&format!(", properties: {}", string_list(&search.properties)));
        }
        bm25.push('}');

        let mut args = vec![format!("limit: {}", search.limit), bm25];
        if let Some(filter) = &search.filter {
            args.push(format!("where: {}", render_filter(filter)));
        }

        render_get(
            &search.collection,
            &args,
            &search.properties,
            "_additional { id score }",
        )
    }

    fn semantic(search: &SemanticSearch) -> String {
        let near = if let Some(vector) = &search.near_vector {
            let mut clause = format!("nearVector: {{vector: {}", float_list(vector));
            if let Some(target) = &search.target_vector {
                clause.push_str(&format!(", targetVectors: [{}]", quote(target)));
            }
            clause.push('}');
            clause
        } else {
            let mut clause = format!("nearText: {{concepts: {}", string_list(&search.concepts));
            if let Some(target) = &search.target_vector {
                clause.push_str(&format!(", targetVectors: [{}]", quote(target)));
            }
            clause.push('}');
            clause
        };

        let mut args = vec![format!("limit: {}", search.limit), near];
        if let Some(filter) = &search.filter {
            args.push(format!("where: {}", render_filter(filter)));
        }

        render_get(
            &search.collection,
            &args,
            &search.properties,
            "_additional { id distance }",
        )
    }

    fn hybrid(search: &HybridSearch) -> String {
        let mut hybrid = format!(
            "hybrid: {{query: {}, alpha: {}",
            quote(&search.query),
            search.alpha
        );
        if !search.properties.is_empty() {
            hybrid.push_str(&format!(", properties: {}", string_list(&search.properties)));
        }
        hybrid.push('}');

        let mut args = vec![format!("limit: {}", search.limit), hybrid];
        if let Some(filter) = &search.filter {
            args.push(format!("where: {}", render_filter(filter)));
        }

        let additional = match &search.generative {
            None => "_additional { id score }".to_string(),
            Some(task) => {
                let mut generate = format!("generate(groupedResult: {{task: {}", quote(&task.task));
                if !task.properties.is_empty() {
                    generate.push_str(&format!(
                        ", properties: {}",
                        string_list(&task.properties)
                    ));
                }
                generate.push_str("}) { groupedResult error }");
                format!("_additional {{ id score {} }}", generate)
            }
        };

        render_get(&search.collection, &args, &search.properties, &additional)
    }
}

/// Render one Get query over a collection
fn render_get(collection: &str, args: &[String], properties: &[String], additional: &str) -> String {
    let mut fields = properties.join(" ");
    if !fields.is_empty() {
        fields.push(' ');
    }
    fields.push_str(additional);

    format!(
        "{{ Get {{ {}({}) {{ {} }} }} }}",
        collection,
        args.join(", "),
        fields
    )
}

/// Render a filter into a `where` argument tree
fn render_filter(filter: &Filter) -> String {
    let conditions = filter.conditions();
    if conditions.len() == 1 {
        render_condition(&conditions[0])
    } else {
        let operands: Vec<String> = conditions.iter().map(render_condition).collect();
        format!("{{operator: And, operands: [{}]}}", operands.join(", "))
    }
}

fn render_condition(condition: &FilterCondition) -> String {
    format!(
        "{{path: [{}], operator: {}, {}: {}}}",
        quote(&condition.path),
        condition.operator,
        condition.value.value_key(),
        render_value(&condition.value)
    )
}

fn render_value(value: &FilterValue) -> String {
    match value {
        FilterValue::Text(s) => quote(s),
        FilterValue::Int(i) => i.to_string(),
        FilterValue::Number(n) => n.to_string(),
        FilterValue::Bool(b) => b.to_string(),
    }
}

/// Quote and escape a string literal for the query language
fn quote(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 2);
    escaped.push('"');
    for c in text.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            other => escaped.push(other),
        }
    }
    escaped.push('"');
    escaped
}

fn string_list(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|item| quote(item)).collect();
    format!("[{}]", quoted.join(", "))
}

fn float_list(items: &[f64]) -> String {
    let rendered: Vec<String> = items.iter().map(|n| n.to_string()).collect();
    format!("[{}]", rendered.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use magicchat_core::{GenerativeTask, RawQuery};

    #[test]
    fn test_keyword_rendering() {
        let request = SearchRequest::Keyword(
            KeywordSearch::new("TVShow", "Rugrats")
                .with_properties(["title", "creator"])
                .with_limit(3),
        );
        let query = GraphQlBuilder::build(&request).unwrap();

        assert!(query.contains("Get { TVShow("));
        assert!(query.contains("limit: 3"));
        assert!(query.contains(r#"bm25: {query: "Rugrats", properties: ["title", "creator"]}"#));
        assert!(query.contains("title creator _additional { id score }"));
    }

    #[test]
    fn test_semantic_near_vector_rendering() {
        let request = SearchRequest::Semantic(
            SemanticSearch::new("TVShow")
                .with_vector(vec![0.1, 0.2, 0.3, 0.4, 0.5])
                .with_properties(["title"])
                .with_limit(3),
        );
        let query = GraphQlBuilder::build(&request).unwrap();

        assert!(query.contains("nearVector: {vector: [0.1, 0.2, 0.3, 0.4, 0.5]}"));
        assert!(query.contains("_additional { id distance }"));
    }

    #[test]
    fn test_semantic_concepts_with_target_vector() {
        let request = SearchRequest::Semantic(
            SemanticSearch::new("Movie")
                .with_concepts(["historical period film"])
                .with_target_vector("overview_vector"),
        );
        let query = GraphQlBuilder::build(&request).unwrap();

        assert!(query.contains(
            r#"nearText: {concepts: ["historical period film"], targetVectors: ["overview_vector"]}"#
        ));
    }

    #[test]
    fn test_hybrid_rendering_with_filter() {
        let request = SearchRequest::Hybrid(
            HybridSearch::new("MovieDemo", "superhero", 0.7)
                .with_properties(["title", "tagline", "poster"])
                .with_filter(
                    Filter::by_property("release_year").greater_or_equal(1990)
                        & Filter::by_property("release_year").less_or_equal(2024),
                )
                .with_limit(10),
        );
        let query = GraphQlBuilder::build(&request).unwrap();

        assert!(query.contains(r#"hybrid: {query: "superhero", alpha: 0.7"#));
        assert!(query.contains("where: {operator: And, operands: ["));
        assert!(query.contains(
            r#"{path: ["release_year"], operator: GreaterThanEqual, valueInt: 1990}"#
        ));
        assert!(query.contains(
            r#"{path: ["release_year"], operator: LessThanEqual, valueInt: 2024}"#
        ));
    }

    #[test]
    fn test_single_condition_filter_has_no_and_wrapper() {
        let request = SearchRequest::Keyword(
            KeywordSearch::new("Movie", "vampires")
                .with_filter(Filter::by_property("title").equal("Black Lotus")),
        );
        let query = GraphQlBuilder::build(&request).unwrap();

        assert!(query.contains(r#"where: {path: ["title"], operator: Equal, valueText: "Black Lotus"}"#));
        assert!(!query.contains("operator: And"));
    }

    #[test]
    fn test_generative_block() {
        let request = SearchRequest::Hybrid(
            HybridSearch::new("MovieDemo", "romance", 0.7).with_generative(
                GenerativeTask::new("Suggest one movie for a quiet night")
                    .with_properties(["title", "tagline"]),
            ),
        );
        let query = GraphQlBuilder::build(&request).unwrap();

        assert!(query.contains(
            r#"generate(groupedResult: {task: "Suggest one movie for a quiet night", properties: ["title", "tagline"]}) { groupedResult error }"#
        ));
    }

    #[test]
    fn test_query_text_is_escaped() {
        let request = SearchRequest::Keyword(KeywordSearch::new(
            "Movie",
            "the \"famous\" card\nwith backslash \\",
        ));
        let query = GraphQlBuilder::build(&request).unwrap();

        assert!(query.contains(r#"bm25: {query: "the \"famous\" card\nwith backslash \\"}"#));
    }

    #[test]
    fn test_raw_query_passes_verbatim() {
        let raw = "{ Get { Movie(limit: 10) { title overview vote_average } } }";
        let request = SearchRequest::Raw(RawQuery::new(raw));
        assert_eq!(GraphQlBuilder::build(&request).unwrap(), raw);
    }

    #[test]
    fn test_invalid_request_fails_before_rendering() {
        let request = SearchRequest::Keyword(KeywordSearch::new("Movie", "x").with_limit(0));
        assert!(GraphQlBuilder::build(&request).is_err());

        let request = SearchRequest::Hybrid(HybridSearch::new("Movie", "x", 2.0));
        assert!(GraphQlBuilder::build(&request).is_err());
    }

    #[test]
    fn test_alpha_zero_renders_as_integer_zero() {
        let request = SearchRequest::Hybrid(HybridSearch::new("Movie", "x", 0.0));
        let query = GraphQlBuilder::build(&request).unwrap();
        assert!(query.contains("alpha: 0"));
    }
}
