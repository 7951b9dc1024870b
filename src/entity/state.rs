use super::ResolvedAsset;

/// Per-chat state of the add-subscription dialog
#[derive(Clone, Default, Debug)]
pub enum State {
    #[default]
    Start,
    AwaitingAssets,
    AwaitingInterval {
        assets: Vec<ResolvedAsset>,
    },
    AwaitingTime {
        assets: Vec<ResolvedAsset>,
        interval_days: u32,
    },
}
