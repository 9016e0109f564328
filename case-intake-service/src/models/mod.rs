pub mod case_record;

pub use case_record::CaseRecord;
