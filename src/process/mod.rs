/*!
 * Process Module
 * Task records and the table that owns them
 */

mod table;
mod task;

pub use table::TaskTable;
pub use task::{ExecStats, Task};
