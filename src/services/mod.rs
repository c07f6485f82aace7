pub mod news_filter;
pub mod news_service;
pub mod quote_normalizer;
pub mod quote_service;
pub mod range_resolver;
pub mod symbol_service;
