//! Post-processing of update blocks.

use super::block::UsfmUpdateBlock;

/// Transforms each finished block before it is written.
///
/// Handlers run in the order they were added, each receiving the previous
/// handler's output. A handler passed by `&mut` stays owned by the caller,
/// which can inspect it after the parse.
pub trait UsfmUpdateBlockHandler {
    /// Returns the block to write in place of `block`.
    fn process_block(&mut self, block: UsfmUpdateBlock) -> UsfmUpdateBlock;
}

impl<T: UsfmUpdateBlockHandler + ?Sized> UsfmUpdateBlockHandler for &mut T {
    fn process_block(&mut self, block: UsfmUpdateBlock) -> UsfmUpdateBlock {
        (**self).process_block(block)
    }
}

impl<T: UsfmUpdateBlockHandler + ?Sized> UsfmUpdateBlockHandler for Box<T> {
    fn process_block(&mut self, block: UsfmUpdateBlock) -> UsfmUpdateBlock {
        (**self).process_block(block)
    }
}
