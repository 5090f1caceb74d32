//! One-shot search command

use clap::Args;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use magicchat_core::{
    Filter, HybridSearch, KeywordSearch, MagicChatError, QueryTable, SemanticSearch,
};
use magicchat_parser::parse_file;
use magicchat_runtime::{SearchExecutor, WeaviateConnection};
use magicchat_types::SearchMode;

/// Search command arguments
#[derive(Args, Debug)]
pub struct SearchCommand {
    /// Query text
    pub query: String,

    /// Ranking mode: keyword, semantic, or hybrid
    #[arg(short, long, default_value = "hybrid")]
    pub mode: String,

    /// Maximum number of rows to return
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Properties to return (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub properties: Vec<String>,

    /// Inclusive lower bound on the release year
    #[arg(long)]
    pub year_from: Option<i64>,

    /// Inclusive upper bound on the release year
    #[arg(long)]
    pub year_to: Option<i64>,

    /// Treat the query text as a raw query and pass it verbatim
    #[arg(long)]
    pub raw: bool,
}

impl SearchCommand {
    /// Execute the search command
    pub async fn execute(&self, config_path: &str) -> Result<(), MagicChatError> {
        let model = parse_file(config_path)?;

        let connection = WeaviateConnection::connect(model.connection.clone()).await?;
        // A one-shot invocation has nothing to memoize
        let executor = SearchExecutor::new(&connection, Duration::ZERO);

        let table = if self.raw {
            executor.raw_query(&self.query).await?
        } else {
            self.run_typed(&executor, &model).await?
        };

        print_table(&table);
        connection.close().await?;
        Ok(())
    }

    async fn run_typed(
        &self,
        executor: &SearchExecutor,
        model: &magicchat_core::Model,
    ) -> Result<QueryTable, MagicChatError> {
        let mode = SearchMode::from_str(&self.mode).map_err(MagicChatError::Validation)?;

        let collection = model.search.collection.clone();
        let properties = if self.properties.is_empty() {
            model.search.properties.clone()
        } else {
            self.properties.clone()
        };
        let limit = self.limit.unwrap_or(model.search.limit);
        let filter = self.filter();

        info!("Running {} search against {}", mode, collection);

        match mode {
            SearchMode::Keyword => {
                let mut search = KeywordSearch::new(collection, self.query.clone())
                    .with_properties(properties)
                    .with_limit(limit);
                if let Some(filter) = filter {
                    search = search.with_filter(filter);
                }
                executor.keyword_search(search).await
            }
            SearchMode::Semantic => {
                let mut search = SemanticSearch::new(collection)
                    .with_concepts([self.query.clone()])
                    .with_properties(properties)
                    .with_limit(limit);
                if let Some(filter) = filter {
                    search = search.with_filter(filter);
                }
                executor.semantic_search(search).await
            }
            SearchMode::Hybrid => {
                let mut search = HybridSearch::new(
                    collection,
                    self.query.clone(),
                    model.search.alpha_for(SearchMode::Hybrid),
                )
                .with_properties(properties)
                .with_limit(limit);
                if let Some(filter) = filter {
                    search = search.with_filter(filter);
                }
                executor
                    .hybrid_search(search)
                    .await
                    .map(|(table, _)| table)
            }
        }
    }

    fn filter(&self) -> Option<Filter> {
        match (self.year_from, self.year_to) {
            (Some(from), Some(to)) => Some(
                Filter::by_property("release_year").greater_or_equal(from)
                    & Filter::by_property("release_year").less_or_equal(to),
            ),
            (Some(from), None) => {
                Some(Filter::by_property("release_year").greater_or_equal(from))
            }
            (None, Some(to)) => Some(Filter::by_property("release_year").less_or_equal(to)),
            (None, None) => None,
        }
    }
}

/// Print a result table to stdout
fn print_table(table: &QueryTable) {
    if table.is_empty() {
        println!("No results.");
        return;
    }

    println!("{}", table.columns().join(" | "));
    for row in table.rows() {
        let cells: Vec<String> = table
            .columns()
            .iter()
            .map(|column| {
                row.get(column)
                    .map(|value| value.to_string())
                    .unwrap_or_default()
            })
            .collect();
        println!("{}", cells.join(" | "));
    }
    println!("\n{} rows", table.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(query: &str) -> SearchCommand {
        SearchCommand {
            query: query.to_string(),
            mode: "hybrid".to_string(),
            limit: None,
            properties: Vec::new(),
            year_from: None,
            year_to: None,
            raw: false,
        }
    }

    #[test]
    fn test_filter_from_year_bounds() {
        let mut cmd = command("superhero");
        assert!(cmd.filter().is_none());

        cmd.year_from = Some(1990);
        cmd.year_to = Some(2024);
        assert_eq!(cmd.filter().unwrap().conditions().len(), 2);
    }

    #[test]
    fn test_print_empty_table_does_not_panic() {
        print_table(&QueryTable::empty());
    }
}
