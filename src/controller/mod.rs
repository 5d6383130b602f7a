pub(crate) mod disintegration;
pub(crate) mod run;
