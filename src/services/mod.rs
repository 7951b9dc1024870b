pub mod alert_config;
pub mod alert_service;
pub mod batch_notifier;
pub mod due_selector;
