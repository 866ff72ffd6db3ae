//! Web search domain - live search results used to ground generation

mod entity;
mod provider;

pub use entity::{
    format_search_results_as_context, WebSearchRequest, WebSearchResponse, WebSearchResult,
    DEFAULT_NUM_RESULTS,
};
pub use provider::WebSearch;

#[cfg(test)]
pub use provider::MockWebSearch;
