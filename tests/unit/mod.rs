pub mod ledger_invariant_tests;
pub mod outcome_tests;
pub mod serialization_tests;
