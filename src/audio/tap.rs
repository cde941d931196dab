use super::format::FrameFormat;
use super::stream::FrameSource;
use crate::error::StreamError;
use ringbuf::{HeapCons, HeapProd, HeapRb, traits::*};
use rodio::Source;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Split a source into a pass-through player side and an analysis side
///
/// The returned `TappedSource` must be handed to the mixer; it copies every
/// sample it yields into a ring of `capacity` samples read by `WaveformTap`.
pub fn tap<S: Source>(inner: S, capacity: usize, format: FrameFormat) -> (TappedSource<S>, WaveformTap) {
    let ring = HeapRb::<f32>::new(capacity);
    let (producer, consumer) = ring.split();
    let exhausted = Arc::new(AtomicBool::new(false));

    let source = TappedSource {
        inner,
        producer,
        exhausted: exhausted.clone(),
    };
    let tap = WaveformTap {
        consumer,
        window: vec![FrameFormat::MIDPOINT; format.frame_len],
        scratch: vec![0.0; format.frame_len.max(512)],
        exhausted,
    };

    (source, tap)
}

/// Pass-through source feeding the analysis ring from the audio thread
pub struct TappedSource<S> {
    inner: S,
    producer: HeapProd<f32>,
    exhausted: Arc<AtomicBool>,
}

impl<S: Source> Iterator for TappedSource<S> {
    type Item = rodio::Sample;

    fn next(&mut self) -> Option<Self::Item> {
        match self.inner.next() {
            Some(sample) => {
                // Ring full means nobody is reading; dropping is fine
                let _ = self.producer.try_push(sample);
                Some(sample)
            }
            None => {
                self.exhausted.store(true, Ordering::Release);
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<S: Source> Source for TappedSource<S> {
    fn current_span_len(&self) -> Option<usize> {
        self.inner.current_span_len()
    }

    fn channels(&self) -> rodio::ChannelCount {
        self.inner.channels()
    }

    fn sample_rate(&self) -> rodio::SampleRate {
        self.inner.sample_rate()
    }

    fn total_duration(&self) -> Option<Duration> {
        self.inner.total_duration()
    }
}

/// Reading side of the tap, keeps the latest frame on the byte scale
pub struct WaveformTap {
    consumer: HeapCons<f32>,
    window: Vec<f32>,
    scratch: Vec<f32>,
    exhausted: Arc<AtomicBool>,
}

impl WaveformTap {
    /// Discard buffered samples and reset the window to silence
    pub fn reset(&mut self) {
        let stale = self.consumer.occupied_len();
        self.consumer.skip(stale);
        self.window.fill(FrameFormat::MIDPOINT);
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted.load(Ordering::Acquire)
    }

    /// Move everything buffered into the window, returns samples consumed
    fn drain(&mut self) -> usize {
        let mut total = 0;
        loop {
            let n = self.consumer.pop_slice(&mut self.scratch);
            if n == 0 {
                break;
            }
            total += n;
            push_window(&mut self.window, &self.scratch[..n]);
        }
        total
    }
}

fn push_window(window: &mut [f32], samples: &[f32]) {
    let len = window.len();
    if samples.len() >= len {
        let tail = &samples[samples.len() - len..];
        for (slot, sample) in window.iter_mut().zip(tail) {
            *slot = FrameFormat::to_byte_scale(*sample);
        }
        return;
    }

    window.rotate_left(samples.len());
    let start = len - samples.len();
    for (slot, sample) in window[start..].iter_mut().zip(samples) {
        *slot = FrameFormat::to_byte_scale(*sample);
    }
}

impl FrameSource for WaveformTap {
    fn read_frame(&mut self, frame: &mut [f32]) -> Result<(), StreamError> {
        let fresh = self.drain();
        if fresh == 0 && self.is_exhausted() {
            return Err(StreamError::Ended);
        }

        let len = frame.len().min(self.window.len());
        frame[..len].copy_from_slice(&self.window[self.window.len() - len..]);
        frame[len..].fill(FrameFormat::MIDPOINT);
        Ok(())
    }
}
