/// Fails compilation when `$check` does not hold.
#[macro_export]
macro_rules! const_assert {
    ($check:expr $(, $msg:tt)* $(,)?) => {
        const _: () = assert!($check $(, $msg)*);
    };
}

#[macro_export]
macro_rules! size_of {
    ($t:ty) => {
        ::core::mem::size_of::<$t>()
    };
}
