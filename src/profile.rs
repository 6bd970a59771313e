//! A lightweight timing span, enabled only behind the `profile` feature.
//! The teacher's workspace depends on an internal `profile` crate (one
//! `profile::span("label")` call per query) that doesn't exist outside that
//! workspace; this carries the same call-site shape without depending on it.

#[cfg(feature = "profile")]
pub struct Timing {
    label: &'static str,
    start: std::time::Instant,
}

#[cfg(feature = "profile")]
impl Timing {
    pub fn new(label: &'static str) -> Timing {
        Timing { label, start: std::time::Instant::now() }
    }
}

#[cfg(feature = "profile")]
impl Drop for Timing {
    fn drop(&mut self) {
        log::trace!("{} took {:?}", self.label, self.start.elapsed());
    }
}

#[cfg(not(feature = "profile"))]
pub struct Timing;

#[cfg(not(feature = "profile"))]
impl Timing {
    #[inline]
    pub fn new(_label: &'static str) -> Timing {
        Timing
    }
}

pub fn span(label: &'static str) -> Timing {
    Timing::new(label)
}
