pub mod branches;
pub mod comments;
pub mod commits;
pub mod common;
pub mod files;
pub mod issues;
pub mod pipeline_variables;
pub mod pipelines;
pub mod pulls;
pub mod repos;
pub mod tags;
pub mod users;
pub mod webhooks;
pub mod workspaces;
