pub mod policy_builder;
