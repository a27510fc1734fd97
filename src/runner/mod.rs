pub mod binding;
pub mod ds;
pub mod plugin;
