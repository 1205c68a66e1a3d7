//! Implementations of Codec for owning pointers.
//!
//! Outside an optional context, an indirection is transparent: `Box<T>`, `Rc<T>` and `Arc<T>`
//! encode exactly like `T`.

use crate::{Decode, Decoder, Encode, Encoder, Error};
use std::{io, rc::Rc, sync::Arc};

macro_rules! impl_pointer {
    ($($pointer:ident),+) => {
        $(
            impl<T: Encode + ?Sized> Encode for $pointer<T> {
                #[inline]
                fn write<W: io::Write>(&self, encoder: &mut Encoder<W>) -> Result<(), Error> {
                    (**self).write(encoder)
                }
            }

            impl<T: Decode> Decode for $pointer<T> {
                #[inline]
                fn read<R: io::Read>(decoder: &mut Decoder<R>) -> Result<Self, Error> {
                    T::read(decoder).map($pointer::new)
                }
            }
        )+
    };
}

impl_pointer!(Box, Rc, Arc);
