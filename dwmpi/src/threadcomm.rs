use crate::{CommError, Communicator, MPIDataType, ROOT};

use std::any::Any;
use std::sync::{Arc, Barrier, Mutex, MutexGuard};

type Slot = Option<Box<dyn Any + Send>>;

struct Shared {
    size: usize,
    barrier: Barrier,
    slots: Mutex<Vec<Slot>>,
}

/// One worker of an in-process world whose workers are OS threads.
///
/// Collectives exchange data through one mailbox slot per worker and are
/// fenced by a barrier on entry and on exit, so a slot is never refilled
/// before every worker has finished reading it.
pub struct ThreadComm {
    rank: usize,
    shared: Arc<Shared>,
}

impl ThreadComm {
    /// Runs `f` on `size` workers and returns their results in rank order.
    ///
    /// # Panics
    ///
    /// `size` is zero, or a worker panicked.
    pub fn run<R, F>(size: usize, f: F) -> Vec<R>
    where
        F: Fn(&ThreadComm) -> R + Sync,
        R: Send,
    {
        assert!(size > 0, "a worker world needs at least one worker");

        let shared = Arc::new(Shared {
            size,
            barrier: Barrier::new(size),
            slots: Mutex::new((0..size).map(|_| None).collect()),
        });

        let f = &f;

        std::thread::scope(|s| {
            let handles: Vec<_> = (0..size)
                .map(|rank| {
                    let comm = ThreadComm {
                        rank,
                        shared: Arc::clone(&shared),
                    };

                    s.spawn(move || f(&comm))
                })
                .collect();

            handles
                .into_iter()
                .map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
                .collect()
        })
    }

    fn wait(&self) {
        self.shared.barrier.wait();
    }

    fn slots(&self) -> Result<MutexGuard<'_, Vec<Slot>>, CommError> {
        self.shared.slots.lock().map_err(|_| CommError::Poisoned)
    }

    fn deposit(&self, value: Box<dyn Any + Send>) -> Result<(), CommError> {
        self.slots()?[self.rank] = Some(value);
        Ok(())
    }
}

impl Communicator for ThreadComm {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.shared.size
    }

    fn barrier(&self) -> Result<(), CommError> {
        self.wait();
        Ok(())
    }

    fn allreduce_min_max(&self, value: u64) -> Result<(u64, u64), CommError> {
        let deposited = self.deposit(Box::new(value));
        self.wait();

        let result = deposited.and_then(|_| {
            let slots = self.slots()?;

            let mut minmax = (u64::MAX, u64::MIN);

            for slot in slots.iter() {
                let v = slot
                    .as_ref()
                    .and_then(|b| b.downcast_ref::<u64>())
                    .ok_or(CommError::TypeMismatch)?;

                minmax = (minmax.0.min(*v), minmax.1.max(*v));
            }

            Ok(minmax)
        });

        self.wait();

        result
    }

    fn reduce_sum_raw<T: MPIDataType>(&self, local: Vec<T>) -> Result<Option<Vec<T>>, CommError> {
        let deposited = self.deposit(Box::new(local));
        self.wait();

        let result = deposited.and_then(|_| {
            if self.rank != ROOT {
                return Ok(None);
            }

            let mut slots = self.slots()?;

            let mut parts = slots.iter_mut().map(|slot| {
                slot.take()
                    .and_then(|b| b.downcast::<Vec<T>>().ok())
                    .ok_or(CommError::TypeMismatch)
            });

            let mut acc = match parts.next() {
                Some(first) => *first?,
                None => return Ok(Some(Vec::new())),
            };

            for part in parts {
                let part = part?;

                if part.len() != acc.len() {
                    return Err(CommError::ShapeMismatch {
                        min: part.len().min(acc.len()),
                        max: part.len().max(acc.len()),
                    });
                }

                for (a, b) in acc.iter_mut().zip(part.iter()) {
                    *a += *b;
                }
            }

            Ok(Some(acc))
        });

        self.wait();

        result
    }

    fn bcast_raw<T: MPIDataType>(&self, buf: &mut [T]) -> Result<(), CommError> {
        let deposited = if self.rank == ROOT {
            self.deposit(Box::new(buf.to_vec()))
        } else {
            Ok(())
        };

        self.wait();

        let result = deposited.and_then(|_| {
            if self.rank == ROOT {
                return Ok(());
            }

            let slots = self.slots()?;

            let src = slots[ROOT]
                .as_ref()
                .and_then(|b| b.downcast_ref::<Vec<T>>())
                .ok_or(CommError::TypeMismatch)?;

            if src.len() != buf.len() {
                return Err(CommError::ShapeMismatch {
                    min: src.len().min(buf.len()),
                    max: src.len().max(buf.len()),
                });
            }

            buf.copy_from_slice(src);

            Ok(())
        });

        self.wait();

        result
    }
}
