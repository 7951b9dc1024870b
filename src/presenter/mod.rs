pub mod subscription_presenter;
