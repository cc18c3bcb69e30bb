//! Single-flight cache for the embedding extractor
//!
//! The extractor is slow to build (model load, provider registration), so
//! it is constructed at most once per process. Concurrent callers arriving
//! while a construction is in flight wait for it and all observe the same
//! outcome. A failed construction is not remembered as the answer for
//! later callers: the next `acquire` after a failure starts a fresh epoch.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, OnceLock, PoisonError};
use std::time::Instant;

use crate::error::{Error, Result};
use crate::ui;

type Loader<E> = Box<dyn Fn() -> anyhow::Result<E> + Send + Sync>;

type Outcome<E> = std::result::Result<Arc<E>, String>;

/// One construction attempt; its outcome is written exactly once
struct Flight<E> {
	epoch: u64,
	outcome: OnceLock<Outcome<E>>,
}

impl<E> Flight<E> {
	fn result(&self) -> Option<Result<Arc<E>>> {
		self.outcome.get().map(|outcome| match outcome {
			Ok(extractor) => Ok(Arc::clone(extractor)),
			Err(msg) => Err(Error::ExtractorInit(msg.clone())),
		})
	}
}

enum State<E> {
	Uninitialized,
	Initializing(Arc<Flight<E>>),
	Ready(Arc<E>),
}

struct Inner<E> {
	state: State<E>,
	/// Number of construction attempts started so far
	epochs: u64,
}

pub struct EmbeddingCache<E> {
	inner: Mutex<Inner<E>>,
	settled: Condvar,
	loader: Loader<E>,
}

impl<E> EmbeddingCache<E> {
	pub fn new<F>(loader: F) -> Self
	where
		F: Fn() -> anyhow::Result<E> + Send + Sync + 'static,
	{
		Self {
			inner: Mutex::new(Inner {
				state: State::Uninitialized,
				epochs: 0,
			}),
			settled: Condvar::new(),
			loader: Box::new(loader),
		}
	}

	/// Cache that is already holding an extractor
	pub fn ready(extractor: E) -> Self {
		let cache = Self::new(|| anyhow::bail!("extractor was supplied pre-built"));
		cache.lock().state = State::Ready(Arc::new(extractor));
		cache
	}

	pub fn is_ready(&self) -> bool {
		matches!(self.lock().state, State::Ready(_))
	}

	/// Get the shared extractor, constructing it if nobody has yet.
	///
	/// A caller that finds a construction in flight gets exactly that
	/// construction's outcome, whatever later attempts do.
	pub fn acquire(&self) -> Result<Arc<E>> {
		let mut inner = self.lock();

		let flight = match &inner.state {
			State::Ready(extractor) => return Ok(Arc::clone(extractor)),
			State::Initializing(flight) => Some(Arc::clone(flight)),
			State::Uninitialized => None,
		};

		if let Some(flight) = flight {
			ui::debug(&format!("Waiting for extractor construction (epoch {})", flight.epoch));
			let _settled = self
				.settled
				.wait_while(inner, |_| flight.outcome.get().is_none())
				.unwrap_or_else(PoisonError::into_inner);
			return flight
				.result()
				.unwrap_or_else(|| Err(Error::ExtractorInit("construction did not settle".into())));
		}

		inner.epochs += 1;
		let flight = Arc::new(Flight { epoch: inner.epochs, outcome: OnceLock::new() });
		inner.state = State::Initializing(Arc::clone(&flight));
		drop(inner);

		// Construction runs without the lock so waiters only block on the condvar
		let guard = Construction { cache: self, flight };
		let start = Instant::now();
		ui::debug(&format!("Constructing embedding extractor (epoch {})", guard.flight.epoch));

		let outcome = (self.loader)().map(Arc::new);
		match &outcome {
			Ok(_) => ui::success(&format!(
				"Embedding model ready in {:.2}s",
				start.elapsed().as_secs_f32()
			)),
			Err(e) => ui::error(&format!("Embedding model failed to load: {:#}", e)),
		}

		guard.settle(outcome.map_err(|e| format!("{:#}", e)));
		guard
			.flight
			.result()
			.unwrap_or_else(|| Err(Error::ExtractorInit("construction did not settle".into())))
	}

	fn lock(&self) -> MutexGuard<'_, Inner<E>> {
		self.inner.lock().unwrap_or_else(PoisonError::into_inner)
	}
}

/// Publishes the outcome of one epoch; a loader panic counts as failure.
struct Construction<'a, E> {
	cache: &'a EmbeddingCache<E>,
	flight: Arc<Flight<E>>,
}

impl<E> Construction<'_, E> {
	/// First outcome wins; the state moves on only if this epoch still owns it
	fn settle(&self, outcome: Outcome<E>) {
		let mut inner = self.cache.lock();
		if self.flight.outcome.set(outcome).is_err() {
			return;
		}

		let owns_state = matches!(&inner.state, State::Initializing(f) if Arc::ptr_eq(f, &self.flight));
		if owns_state {
			inner.state = match self.flight.outcome.get() {
				Some(Ok(extractor)) => State::Ready(Arc::clone(extractor)),
				_ => State::Uninitialized,
			};
		}

		drop(inner);
		self.cache.settled.notify_all();
	}
}

impl<E> Drop for Construction<'_, E> {
	fn drop(&mut self) {
		if self.flight.outcome.get().is_none() {
			self.settle(Err("extractor construction panicked".to_string()));
		}
	}
}
