/// Values read off the wire are untrusted and get wrapped in this type.
///
/// The wrapped value has to pass through one of the accessors below, which makes each place that
/// accepts wire data without a check visible in the source.
#[derive(Clone, Copy, Debug)]
pub struct Restrict<T>(T);

impl<T> Restrict<T> {
    /// Wrap an untrusted value
    #[inline]
    pub fn new(restricted: T) -> Self {
        Self(restricted)
    }

    /// Returns `Ok(T)` if `f` accepts the value, the rejected value as `Err(T)` otherwise.
    ///
    /// ```
    /// use dnswire::serialize::binary::Restrict;
    ///
    /// let label_len = Restrict::new(12_u8).verify_unwrap(|l| *l <= 63).unwrap();
    /// assert_eq!(label_len, 12);
    /// assert!(Restrict::new(64_u8).verify_unwrap(|l| *l <= 63).is_err());
    /// ```
    #[inline]
    pub fn verify_unwrap<F: Fn(&T) -> bool>(self, f: F) -> Result<T, T> {
        if f(&self.0) {
            Ok(self.0)
        } else {
            Err(self.0)
        }
    }

    /// Unwraps the value for fields where every bit pattern is valid
    #[inline]
    pub fn unverified(self) -> T {
        self.0
    }

    /// Map the wrapped value, keeping it restricted
    #[inline]
    pub fn map<R, F: FnOnce(T) -> R>(self, f: F) -> Restrict<R> {
        Restrict(f(self.0))
    }
}

/// Arithmetic on restricted lengths, used to size the trailing blobs of rdata
pub trait RestrictedMath {
    /// Argument for the math operations
    type Arg: 'static + Sized + Copy;
    /// Return value, generally the same as Arg
    type Value: 'static + Sized + Copy;

    /// Checked subtraction, see `usize::checked_sub`
    fn checked_sub(&self, arg: Self::Arg) -> Result<Restrict<Self::Value>, Self::Arg>;
}

impl RestrictedMath for Restrict<u16> {
    type Arg = u16;
    type Value = u16;

    fn checked_sub(&self, arg: u16) -> Result<Restrict<u16>, u16> {
        self.0.checked_sub(arg).map(Restrict).ok_or(arg)
    }
}

impl RestrictedMath for Restrict<usize> {
    type Arg = usize;
    type Value = usize;

    fn checked_sub(&self, arg: usize) -> Result<Restrict<usize>, usize> {
        self.0.checked_sub(arg).map(Restrict).ok_or(arg)
    }
}
