//! Output sinks for rendered frames.

use std::ops::ControlFlow;

use crate::error::Result;
use crate::frame::Frame;

/// Receives frames in generation order.
///
/// Returning `ControlFlow::Break` stops a sequence before the next frame is
/// rendered; an error aborts it.
pub trait FrameSink {
    fn accept(&mut self, index: usize, frame: Frame) -> Result<ControlFlow<()>>;
}

impl FrameSink for Vec<Frame> {
    fn accept(&mut self, _index: usize, frame: Frame) -> Result<ControlFlow<()>> {
        self.push(frame);
        Ok(ControlFlow::Continue(()))
    }
}

/// Adapts a closure into a [`FrameSink`].
pub struct FnSink<F>(pub F);

impl<F> FrameSink for FnSink<F>
where
    F: FnMut(usize, Frame) -> Result<ControlFlow<()>>,
{
    fn accept(&mut self, index: usize, frame: Frame) -> Result<ControlFlow<()>> {
        (self.0)(index, frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_sink_collects_in_order() {
        let mut frames: Vec<Frame> = Vec::new();
        for i in 0..3u32 {
            let flow = frames.accept(i as usize, Frame::new(i + 1, 1)).unwrap();
            assert_eq!(flow, ControlFlow::Continue(()));
        }
        let widths: Vec<u32> = frames.iter().map(Frame::width).collect();
        assert_eq!(widths, [1, 2, 3]);
    }

    #[test]
    fn test_fn_sink_can_stop() {
        let mut seen = Vec::new();
        let mut sink = FnSink(|i: usize, _frame: Frame| -> Result<ControlFlow<()>> {
            seen.push(i);
            Ok(if i == 1 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            })
        });
        assert_eq!(sink.accept(0, Frame::new(1, 1)).unwrap(), ControlFlow::Continue(()));
        assert_eq!(sink.accept(1, Frame::new(1, 1)).unwrap(), ControlFlow::Break(()));
        drop(sink);
        assert_eq!(seen, [0, 1]);
    }
}
