//! The consumer side of a decode pass.
//!
//! The decoder calls exactly one method per decoded element, in document order, and
//! brackets SEQUENCE and SET contents with start/end calls. Every payload is an owned
//! copy; nothing handed over borrows from the input buffer. A visitor cannot stop the
//! pass early and has no way to reach back into the decoder.

pub trait Visitor {
    /// Big-endian magnitude and sign of an INTEGER.
    fn integer(&mut self, magnitude: Vec<u8>, negative: bool);
    fn null(&mut self);
    /// BIT STRING content with the declared unused trailing bits cleared.
    fn bit_string(&mut self, bits: Vec<u8>);
    /// OBJECT IDENTIFIER arcs, each as a big-endian unsigned byte string.
    fn oid(&mut self, arcs: Vec<Vec<u8>>);
    fn printable_string(&mut self, text: String);
    fn utc_time(&mut self, text: String);
    /// A bare constructed identifier (0x20 after class stripping). Its content is not
    /// entered; whatever follows is decoded as sibling elements.
    fn constructed(&mut self);
    fn sequence_start(&mut self);
    fn sequence_end(&mut self);
    fn set_start(&mut self);
    fn set_end(&mut self);
}

impl<V: Visitor + ?Sized> Visitor for &mut V {
    fn integer(&mut self, magnitude: Vec<u8>, negative: bool) {
        (**self).integer(magnitude, negative)
    }
    fn null(&mut self) {
        (**self).null()
    }
    fn bit_string(&mut self, bits: Vec<u8>) {
        (**self).bit_string(bits)
    }
    fn oid(&mut self, arcs: Vec<Vec<u8>>) {
        (**self).oid(arcs)
    }
    fn printable_string(&mut self, text: String) {
        (**self).printable_string(text)
    }
    fn utc_time(&mut self, text: String) {
        (**self).utc_time(text)
    }
    fn constructed(&mut self) {
        (**self).constructed()
    }
    fn sequence_start(&mut self) {
        (**self).sequence_start()
    }
    fn sequence_end(&mut self) {
        (**self).sequence_end()
    }
    fn set_start(&mut self) {
        (**self).set_start()
    }
    fn set_end(&mut self) {
        (**self).set_end()
    }
}
