//! Write buffer between the embedder and the index writer
//!
//! Holds points only until a full batch accumulates; the orchestrator
//! flushes every full batch immediately and drains the remainder at end of
//! run, so the buffer never exceeds the threshold for longer than one
//! flush.

use crate::types::IndexPoint;

/// Bounded staging area for points awaiting a flush
#[derive(Debug)]
pub struct WriteBuffer {
    points: Vec<IndexPoint>,
    threshold: usize,
}

impl WriteBuffer {
    pub fn new(threshold: usize) -> Self {
        Self {
            points: Vec::new(),
            threshold: threshold.max(1),
        }
    }

    pub fn push(&mut self, point: IndexPoint) {
        self.points.push(point);
    }

    /// Whether a full batch is ready to flush
    pub fn is_full(&self) -> bool {
        self.points.len() >= self.threshold
    }

    /// Remove and return the oldest full batch
    pub fn take_batch(&mut self) -> Vec<IndexPoint> {
        let n = self.threshold.min(self.points.len());
        self.points.drain(..n).collect()
    }

    /// Remove and return everything, regardless of threshold
    pub fn drain(&mut self) -> Vec<IndexPoint> {
        std::mem::take(&mut self.points)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Chunk;

    fn point(i: usize) -> IndexPoint {
        IndexPoint::new(
            &Chunk {
                source_url: "https://example.com/a".to_string(),
                source_title: "A".to_string(),
                ordinal: i,
                text: format!("chunk {}", i),
            },
            vec![0.0; 4],
        )
    }

    #[test]
    fn fills_to_threshold() {
        let mut buffer = WriteBuffer::new(3);
        buffer.push(point(0));
        buffer.push(point(1));
        assert!(!buffer.is_full());
        buffer.push(point(2));
        assert!(buffer.is_full());
    }

    #[test]
    fn take_batch_preserves_order_and_leftovers() {
        let mut buffer = WriteBuffer::new(3);
        for i in 0..4 {
            buffer.push(point(i));
        }
        let batch = buffer.take_batch();
        assert_eq!(batch.len(), 3);
        assert_eq!(batch[0].payload.text, "chunk 0");
        assert_eq!(buffer.len(), 1);
        assert!(!buffer.is_full());
    }

    #[test]
    fn drain_empties_partial_batches() {
        let mut buffer = WriteBuffer::new(3);
        buffer.push(point(0));
        buffer.push(point(1));
        let rest = buffer.drain();
        assert_eq!(rest.len(), 2);
        assert!(buffer.is_empty());
    }
}
