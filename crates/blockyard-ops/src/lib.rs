pub mod ops_actions;
pub mod ops_inspect;
pub mod ops_load;
pub mod ops_tree;
