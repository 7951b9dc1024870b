mod bot_error;
mod price_change;
mod report;
mod resolved_asset;
mod state;
mod subscription;

pub use bot_error::BotError;
pub use price_change::{Direction, PriceChange};
pub use report::{PriceReport, ReportLine};
pub use resolved_asset::{AssetResolution, ResolvedAsset};
pub use state::State;
pub use subscription::{NewSubscription, Subscription, SubscriptionRequest};
