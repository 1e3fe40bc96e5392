//! Command implementations.

pub mod extract;
pub mod list;
pub mod show;
pub mod voices;

pub use self::extract::execute_extract;
pub use self::list::execute_list;
pub use self::show::execute_show;
pub use self::voices::execute_voices;
