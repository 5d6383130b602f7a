//! # Disintegrate guide
//!
//! A standalone walkthrough of what "a run" means in this crate and what a host has to provide.
//!
//! ---
//!
//! ## The timeline
//!
//! A run is four segments followed by a terminal state:
//!
//! ```text
//! | initial_delay | fade_in | hold | fade_out | Complete
//! 0              b0        b1     b2         b3
//! ```
//!
//! [`classify`](crate::classify) maps elapsed milliseconds to a [`Phase`](crate::Phase) and a
//! progress in `[0, 1]`. Segments are half-open, so a zero-length segment is simply never the
//! answer and the run passes straight through it.
//!
//! [`intensity`](crate::intensity) then shapes the effect:
//!
//! | phase      | intensity                     |
//! |------------|-------------------------------|
//! | `Initial`  | `0`                           |
//! | `FadeIn`   | `progress^3 * 0.3`            |
//! | `Hold`     | `0.3`                         |
//! | `FadeOut`  | `0.3 + progress * 0.7`        |
//! | `Complete` | `0`                           |
//!
//! The displacement scale sent to the filter is `intensity * fade_out`, in every phase.
//!
//! ---
//!
//! ## The host contract
//!
//! The controller never sleeps or spawns. A host provides:
//!
//! - a clock: every call carries `now` in milliseconds
//! - a [`FrameScheduler`](crate::FrameScheduler): `request_frame` for the next refresh, `defer` for
//!   "after this refresh's callbacks", `cancel` to release a handle
//! - a [`FilterSink`](crate::FilterSink): the four parameters the controller writes
//!
//! When a scheduled handle comes due, the host passes it back to
//! [`DisintegrationController::fire`](crate::DisintegrationController::fire). Handles that are no
//! longer current (cancelled, or from an older run) are ignored.
//!
//! [`FrameLoop`](crate::FrameLoop) is the in-crate host. Its `step_frame(now)` fires frame
//! callbacks and then drains deferred ones, which is where finalize lands: one scheduling quantum
//! after the tick that reached `Complete`, before the next refresh.
//!
//! ---
//!
//! ## Activation and teardown
//!
//! - Runs start on a rising edge of the activation signal only
//!   ([`ActivationEdge`](crate::ActivationEdge)). A `start` while a run is active is ignored.
//! - Completion calls the run's callback exactly once, after the filter scale is back to `0`.
//! - `cancel` is a hard stop: the scheduled handle is released, the filter returns to scale `0`,
//!   and the completion callback is dropped without being called. Dropping a
//!   [`FrameLoop`](crate::FrameLoop) cancels.
//!
//! ---
//!
//! ## Directions
//!
//! | direction | angles `(x, y)` | selectors `(x, y)` | base frequency        |
//! |-----------|-----------------|--------------------|-----------------------|
//! | `left`    | `(0, 1)`        | `(R, G)`           | caller's              |
//! | `up`      | `(1, 0)`        | `(G, R)`           | caller's              |
//! | `random`  | n/a             | not written        | `0.05`                |
//!
//! The horizontal selector follows the `y` angle and the vertical selector follows the `x` angle.
