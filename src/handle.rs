//! Opaque payload handles
//!
//! 不透明的负载句柄
//!
//! The ring is a pure pass-through for caller-owned data: it stores a handle's
//! bit pattern in an atomic word and hands the same bits back to a consumer. It
//! never dereferences, drops or frees whatever the handle refers to.
//!
//! 环形缓冲区只是调用者数据的透传通道：它将句柄的位模式存入原子字中，
//! 再原样交给消费者。它从不解引用、drop 或释放句柄所指向的内容。

/// Trait for values that can travel through the ring as a machine word
///
/// 可以作为机器字在环形缓冲区中传递的值
///
/// `from_bits(into_bits(x))` must reproduce `x`. Implementations exist for the
/// integers that fit in a `usize` and for raw pointers wrapped in [`RawHandle`].
///
/// `from_bits(into_bits(x))` 必须还原出 `x`。已为可放入 `usize` 的整数和 [`RawHandle`] 包装的裸指针实现。
pub trait Handle: Copy + Send {
    /// Encode the handle as a word
    ///
    /// 将句柄编码为一个字
    fn into_bits(self) -> usize;

    /// Decode a word produced by [`Handle::into_bits`]
    ///
    /// 解码由 [`Handle::into_bits`] 产生的字
    fn from_bits(bits: usize) -> Self;
}

macro_rules! impl_handle_for_int {
    ($($int:ty),* $(,)?) => {
        $(
            impl Handle for $int {
                #[inline]
                fn into_bits(self) -> usize {
                    self as usize
                }

                #[inline]
                fn from_bits(bits: usize) -> Self {
                    bits as $int
                }
            }
        )*
    };
}

impl_handle_for_int!(usize, isize, u8, u16, u32);

#[cfg(target_pointer_width = "64")]
impl_handle_for_int!(u64);

// Raw pointers are Copy but not Send; the ring only moves their address, the
// caller stays responsible for what they point at.
//
// 裸指针不是 Send；环形缓冲区只传递地址，指向的内容仍由调用者负责。

/// Raw pointer handle
///
/// 裸指针句柄
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct RawHandle<T>(pub *mut T);

// Derived Clone/Copy would demand `T: Copy`; the pointer itself always is.
impl<T> Clone for RawHandle<T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for RawHandle<T> {}

// SAFETY: the ring never dereferences the pointer, it only copies the address.
unsafe impl<T> Send for RawHandle<T> {}

impl<T> RawHandle<T> {
    /// Wrap a raw pointer
    ///
    /// 包装一个裸指针
    #[inline]
    pub fn new(ptr: *mut T) -> Self {
        Self(ptr)
    }

    /// A null handle
    ///
    /// 空句柄
    #[inline]
    pub fn null() -> Self {
        Self(std::ptr::null_mut())
    }

    /// The wrapped pointer
    ///
    /// 被包装的指针
    #[inline]
    pub fn as_ptr(self) -> *mut T {
        self.0
    }
}

impl<T> Handle for RawHandle<T> {
    #[inline]
    fn into_bits(self) -> usize {
        self.0 as usize
    }

    #[inline]
    fn from_bits(bits: usize) -> Self {
        Self(bits as *mut T)
    }
}
