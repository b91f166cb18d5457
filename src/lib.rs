// Define data modules
pub mod models; // Data structures (Task, TaskKind, sessions, inputs)
pub mod clock; // Wall-clock source (system / manual)
pub mod store; // Persistence adapter (load/save tasks.json)
pub mod summary; // Daily / weekly rollups, pure functions
pub mod task_store; // Task collection and timer state machine
pub mod config; // CLI / env configuration
pub mod app; // Router and shared state
pub mod routes_tasks; // HTTP handlers for tasks, timer and data management
pub mod routes_summary; // HTTP handlers for daily / weekly reports
