/// Delayed task queue driven by a monotonic millisecond clock.
///
/// Owners advance the clock once per tick and act on whatever came due.
/// Tasks are plain data, so cancelling is just dropping them.
#[derive(Debug)]
pub struct DelayQueue<T> {
    /// Milliseconds elapsed since creation. Never decreases.
    now: f64,
    pending: Vec<Scheduled<T>>,
    next_seq: u64,
}

#[derive(Debug)]
struct Scheduled<T> {
    due: f64,
    seq: u64,
    task: T,
}

impl<T> Default for DelayQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DelayQueue<T> {
    pub fn new() -> Self {
        Self {
            now: 0.0,
            pending: Vec::new(),
            next_seq: 0,
        }
    }

    /// Current clock value in milliseconds.
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Schedule `task` to come due `delay_ms` from now.
    /// A non-positive delay fires on the next `advance`.
    pub fn schedule(&mut self, delay_ms: f32, task: T) {
        let delay = if delay_ms.is_finite() { delay_ms.max(0.0) } else { 0.0 };
        self.pending.push(Scheduled {
            due: self.now + delay as f64,
            seq: self.next_seq,
            task,
        });
        self.next_seq += 1;
    }

    /// Advance the clock by `dt_ms` and return every task that came due,
    /// ordered by due time, then by scheduling order.
    pub fn advance(&mut self, dt_ms: f32) -> Vec<T> {
        if dt_ms.is_finite() && dt_ms > 0.0 {
            self.now += dt_ms as f64;
        }
        if self.pending.is_empty() {
            return Vec::new();
        }

        let now = self.now;
        let (mut due, waiting): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.pending).into_iter().partition(|s| s.due <= now);
        self.pending = waiting;

        due.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|s| s.task).collect()
    }

    /// Drop every pending task. Returns how many were cancelled.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
