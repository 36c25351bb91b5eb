use super::{is_gc, is_undetermined};

/// A template with precomputed prefix tables so that every window query used by the
/// probe filters runs in constant time regardless of window length.
#[derive(Debug, Clone)]
pub struct TemplateIndex {
    text: String,
    gc_prefix: Vec<u32>,
    undetermined_prefix: Vec<u32>,
    /// Prefix counts of positions that begin a run of at least `run_limit` identical bases.
    run_start_prefix: Vec<u32>,
    run_limit: usize,
}

impl TemplateIndex {
    pub fn new(template: &str, run_limit: usize) -> Self {
        let text = template.to_ascii_uppercase();
        let bytes = text.as_bytes();
        let n = bytes.len();

        let mut run_from = vec![0usize; n];
        for i in (0..n).rev() {
            run_from[i] = if i + 1 < n && bytes[i] == bytes[i + 1] {
                run_from[i + 1] + 1
            } else {
                1
            };
        }

        let mut gc_prefix = Vec::with_capacity(n + 1);
        let mut undetermined_prefix = Vec::with_capacity(n + 1);
        let mut run_start_prefix = Vec::with_capacity(n + 1);
        gc_prefix.push(0);
        undetermined_prefix.push(0);
        run_start_prefix.push(0);

        for i in 0..n {
            gc_prefix.push(gc_prefix[i] + is_gc(bytes[i]) as u32);
            undetermined_prefix.push(undetermined_prefix[i] + is_undetermined(bytes[i]) as u32);
            let starts_run = run_limit > 1 && run_from[i] >= run_limit;
            run_start_prefix.push(run_start_prefix[i] + starts_run as u32);
        }

        Self {
            text,
            gc_prefix,
            undetermined_prefix,
            run_start_prefix,
            run_limit,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[inline]
    fn contains(&self, start: usize, len: usize) -> bool {
        len > 0 && start + len <= self.len()
    }

    pub fn window(&self, start: usize, len: usize) -> Option<&str> {
        self.text.get(start..start + len)
    }

    #[inline]
    pub fn base_at(&self, pos: usize) -> Option<u8> {
        self.text.as_bytes().get(pos).copied()
    }

    pub fn gc_count(&self, start: usize, len: usize) -> usize {
        if !self.contains(start, len) {
            return 0;
        }
        (self.gc_prefix[start + len] - self.gc_prefix[start]) as usize
    }

    pub fn gc_percent(&self, start: usize, len: usize) -> f64 {
        if !self.contains(start, len) {
            return 0.0;
        }
        self.gc_count(start, len) as f64 / len as f64 * 100.0
    }

    /// Windows that fall outside the template are reported as undetermined.
    pub fn has_undetermined(&self, start: usize, len: usize) -> bool {
        if !self.contains(start, len) {
            return true;
        }
        self.undetermined_prefix[start + len] > self.undetermined_prefix[start]
    }

    pub fn has_homopolymer(&self, start: usize, len: usize) -> bool {
        if !self.contains(start, len) || self.run_limit <= 1 || len < self.run_limit {
            return false;
        }
        // A run fits in the window iff it starts no later than `start + len - run_limit`.
        let last_start = start + len - self.run_limit;
        self.run_start_prefix[last_start + 1] > self.run_start_prefix[start]
    }
}
