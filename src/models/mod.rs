mod news;
mod provider;
mod quote;
mod range;

pub use news::{NewsArticle, NewsResponse};
pub use provider::ProviderKind;
pub use quote::{CompanyProfile, NormalizedQuote, QuotePoint, QuoteQueryParams};
pub use range::{Interval, ProviderQuery, RangeToken};
