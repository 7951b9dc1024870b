pub mod report_view;
pub mod subscription_view;
