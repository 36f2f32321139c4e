pub mod add;
pub mod branches;
pub mod checkout;
pub mod commit;
pub mod diff;
pub mod history;
pub mod merge;
pub mod refs;
pub mod reset;
pub mod status;
pub mod sync;
pub mod watch;
pub mod workspace;

pub use add::*;
pub use branches::*;
pub use checkout::*;
pub use commit::*;
pub use diff::*;
pub use history::*;
pub use merge::*;
pub use refs::*;
pub use reset::*;
pub use status::*;
pub use sync::*;
pub use watch::*;
pub use workspace::*;
