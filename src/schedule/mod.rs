pub(crate) mod activation;
pub(crate) mod frame_loop;
pub(crate) mod queue;
