pub mod check;
pub mod init;
pub mod parse;
pub mod projects;
pub mod run;
pub mod status;

pub use check::cmd_check;
pub use init::cmd_init;
pub use parse::cmd_parse;
pub use projects::cmd_projects;
pub use run::cmd_run;
pub use status::cmd_status;
