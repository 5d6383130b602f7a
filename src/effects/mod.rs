pub(crate) mod direction;
pub(crate) mod filter;
