pub mod bill_reader;
pub mod bill_writer;
