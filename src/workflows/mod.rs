pub mod ewco;
