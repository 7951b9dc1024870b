pub mod db;
pub mod subscription_interactor;
pub mod subscription_repository;
