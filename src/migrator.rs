pub use migrations::Migrator;
