pub mod apply;
pub mod associate;
pub mod destroy;
pub mod disassociate;
pub mod import;
pub mod plan;
pub mod show;
