//! Domain models for Magic Chat

mod connection;
mod filter;
mod model;
mod object;
mod request;
mod table;

pub use connection::ConnectionParams;
pub use filter::{Filter, FilterCondition, FilterOperator, FilterValue, PropertyFilter};
pub use model::{Model, SearchConfig, ServerConfig};
pub use object::DataObject;
pub use request::{
    GenerativeTask, HybridSearch, KeywordSearch, RawQuery, SearchRequest, SemanticSearch,
};
pub use table::QueryTable;
