// vim: tw=80
//! The test-facing facade: set up behavior and verify call counts.

use fragile::Fragile;
use std::{
    borrow::Cow,
    collections::HashSet,
    fmt::{self, Display},
    marker::PhantomData,
    sync::Arc
};
use tracing::debug;

use crate::{
    arguments::ArgValue,
    error::{MockError, Result},
    interceptor::{Interception, Interceptor, MockBehavior},
    matcher::{ArgMatcher, Matcher},
    record::{self, CallRecord, Outcome},
    signature::OperationSignature,
    times::Times
};

/// A call to a mocked operation returning `R`, described by its signature and
/// one matcher per parameter.
///
/// Generated mocks build these for you.  Hand-written ones can use the
/// builder methods.
///
/// # Examples
/// ```
/// # use easymock::*;
/// let call = Call::<u32>::new("method_with_value_parameter")
///     .arg(it::any::<i32>());
/// assert_eq!("method_with_value_parameter(i32)", call.signature().to_string());
/// assert_eq!("method_with_value_parameter(it::any())", call.expression());
/// ```
pub struct Call<R> {
    signature: OperationSignature,
    matchers: Vec<ArgMatcher>,
    _r: PhantomData<fn() -> R>
}

impl<R> Call<R> {
    /// A call to a parameterless operation.  Add parameters with
    /// [`arg`](#method.arg) or [`value`](#method.value).
    pub fn new<N: Into<Cow<'static, str>>>(name: N) -> Self {
        Call {
            signature: OperationSignature::named(name),
            matchers: Vec::new(),
            _r: PhantomData
        }
    }

    /// Append a parameter of type `T`, matched by `matcher`.
    pub fn arg<T: ArgValue>(mut self, matcher: Matcher<T>) -> Self {
        self.signature = self.signature.param::<T>();
        self.matchers.push(matcher.into());
        self
    }

    /// Append a parameter of type `T`, matched by equality with `value`.
    pub fn value<T: ArgValue + PartialEq>(self, value: T) -> Self {
        self.arg(Matcher::literal(value))
    }

    pub fn signature(&self) -> &OperationSignature {
        &self.signature
    }

    pub fn matchers(&self) -> &[ArgMatcher] {
        &self.matchers
    }

    /// The call as text, as it appears in failure messages
    pub fn expression(&self) -> String {
        record::expression(self.signature.name(), &self.matchers)
    }
}

impl<R> Clone for Call<R> {
    fn clone(&self) -> Self {
        Call {
            signature: self.signature.clone(),
            matchers: self.matchers.clone(),
            _r: PhantomData
        }
    }
}

impl<R> fmt::Debug for Call<R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Call")
            .field("signature", &self.signature)
            .field("matchers", &self.matchers)
            .finish()
    }
}

/// Configures the outcome of one set-up call.
///
/// Created by [`Mock::setup`].  Until [`returns`](#method.returns) or
/// [`throws`](#method.throws) is called, matching calls return the zero value
/// of `R`.  Calling either again replaces the outcome.
pub struct SetupBuilder<'a, R> {
    interceptor: &'a Interceptor,
    call: Call<R>,
    record: Arc<CallRecord>
}

impl<'a, R: 'static> SetupBuilder<'a, R> {
    fn configure(&mut self, outcome: Outcome) -> &mut Self {
        self.record = self.interceptor.insert_record(
            self.call.signature.clone(),
            self.call.matchers.clone(),
            outcome,
            Some(self.record.id()));
        self
    }

    /// Return a clone of `value` from every matching call.
    pub fn returns(&mut self, value: R) -> &mut Self
        where R: Clone + Send + Sync
    {
        self.configure(Outcome::returning(move || Box::new(value.clone())))
    }

    /// Compute the return value anew for every matching call.
    pub fn returns_with<F>(&mut self, f: F) -> &mut Self
        where F: Fn() -> R + Send + Sync + 'static
    {
        self.configure(Outcome::returning(move || Box::new(f())))
    }

    /// Single-threaded version of [`returns_with`](#method.returns_with), for
    /// return types that aren't `Send`.
    ///
    /// It is a runtime error to call the mocked operation, or to drop the mock,
    /// on a thread other than the one that called this method.
    pub fn returns_st<F>(&mut self, f: F) -> &mut Self
        where F: Fn() -> R + 'static
    {
        let fragile = Fragile::new(f);
        self.configure(Outcome::returning(move || Box::new((fragile.get())())))
    }

    /// Raise a clone of `error` from every matching call.
    ///
    /// Operations returning `Result<_, E>` return `Err(error)`.  All others
    /// panic with `error` as the payload.
    pub fn throws<E>(&mut self, error: E) -> &mut Self
        where E: Clone + Send + Sync + 'static
    {
        self.configure(Outcome::throwing(move || Box::new(error.clone())))
    }

    /// Like [`throws`](#method.throws), but build the error anew for every
    /// matching call.
    pub fn throws_with<E, F>(&mut self, f: F) -> &mut Self
        where E: Send + 'static, F: Fn() -> E + Send + Sync + 'static
    {
        self.configure(Outcome::throwing(move || Box::new(f())))
    }

    /// Raise `E::default()` from every matching call.
    pub fn throws_default<E>(&mut self) -> &mut Self
        where E: Default + Send + 'static
    {
        self.throws_with(E::default)
    }

    /// The record currently answering this setup's calls
    pub fn record(&self) -> &Arc<CallRecord> {
        &self.record
    }

    /// How many calls this setup has answered so far
    pub fn invocation_count(&self) -> usize {
        self.record.invocation_count()
    }
}

/// The mock object's engine: owns the [`Interceptor`] and implements the
/// setup and verification API on top of it.
///
/// Generated mocks embed one of these and forward every trait method to
/// [`Interceptor::dispatch`].
pub struct Mock {
    interceptor: Interceptor
}

impl Mock {
    pub fn new<N: Into<Cow<'static, str>>>(name: N) -> Self {
        Mock { interceptor: Interceptor::new(name) }
    }

    pub fn with_behavior(self, behavior: MockBehavior) -> Self {
        Mock { interceptor: self.interceptor.with_behavior(behavior) }
    }

    pub fn name(&self) -> &str {
        self.interceptor.name()
    }

    pub fn behavior(&self) -> MockBehavior {
        self.interceptor.behavior()
    }

    pub fn interceptor(&self) -> &Interceptor {
        &self.interceptor
    }

    pub fn declare(&self, signature: OperationSignature,
                   interception: Interception)
    {
        self.interceptor.declare(signature, interception)
    }

    fn check_overridable(&self, signature: &OperationSignature) -> Result<()> {
        match self.interceptor.interception(signature) {
            Ok(Interception::Sealed) => {
                Err(MockError::NonOverridableOperation {
                    signature: signature.to_string()
                })
            },
            _ => Ok(())
        }
    }

    /// Start configuring `call`.
    ///
    /// Matching calls are accepted from now on, even by a strict mock, and
    /// return the zero value until an outcome is set on the returned builder.
    pub fn setup<R: 'static>(&self, call: Call<R>)
        -> Result<SetupBuilder<'_, R>>
    {
        self.check_overridable(&call.signature)?;
        let record = self.interceptor.register(call.signature.clone(),
                                               call.matchers.clone(),
                                               Outcome::Unconfigured)?;
        Ok(SetupBuilder {
            interceptor: &self.interceptor,
            call,
            record
        })
    }

    /// How many live calls satisfied `call`'s matchers?
    pub fn invocation_count<R>(&self, call: &Call<R>) -> Result<usize> {
        self.check_overridable(&call.signature)?;
        self.interceptor.lookup_for_verification(&call.signature,
                                                 &call.matchers)
    }

    /// Check that `call` happened the expected number of `times`.
    ///
    /// Never changes any state.  Fails with
    /// [`MockError::VerificationFailed`] if the count is wrong, and with
    /// [`MockError::NonOverridableOperation`] before counting anything if the
    /// operation can't be intercepted.
    pub fn verify<R>(&self, call: &Call<R>, times: Times) -> Result<()> {
        let count = self.invocation_count(call)?;
        if times.evaluate(count) {
            return Ok(());
        }
        let mut message = times.failure_message(self.name(),
                                                &call.expression(), count);
        let invocations = self.interceptor.invocations(&call.signature)?;
        if invocations.is_empty() {
            message.push_str("\nNo invocations performed.");
        } else {
            message.push_str("\nPerformed invocations:");
            for i in invocations.iter() {
                message.push_str(&format!("\n  {}{}", call.signature.name(), i));
            }
        }
        debug!(mock = %self.name(), operation = %call.signature, count,
               expected = %times, "verification failed");
        Err(MockError::VerificationFailed { message })
    }
}

impl fmt::Debug for Mock {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Mock")
            .field("interceptor", &self.interceptor)
            .finish()
    }
}

/// A summary of every declared operation, its setups and its call counts.
impl Display for Mock {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let i = &self.interceptor;
        let sigs = i.operations();
        let mut lines = Vec::new();
        let mut setups = 0;
        let mut calls = 0;
        for sig in sigs.iter() {
            let records = i.records_for(sig).unwrap_or_default();
            let n = i.invocations(sig).map(|v| v.len()).unwrap_or_default();
            let sealed = match i.interception(sig) {
                Ok(Interception::Sealed) => " [sealed]",
                _ => ""
            };
            let replaced = records.iter()
                .filter_map(|r| r.replaces())
                .collect::<HashSet<_>>();
            setups += records.iter()
                .filter(|r| !replaced.contains(&r.id()))
                .count();
            calls += n;
            lines.push(format!("  {}{}: {} call(s)", sig, sealed, n));
            for r in records.iter() {
                let note = if replaced.contains(&r.id()) {
                    " [replaced]"
                } else {
                    ""
                };
                lines.push(format!("    setup {} {} => {:?}, {} call(s){}",
                                   r.id(), r.expression(), r.outcome(),
                                   r.invocation_count(), note));
            }
        }
        write!(f, "{}: {} operation(s), {} setup(s), {} invocation(s)",
               self.name(), sigs.len(), setups, calls)?;
        for l in lines {
            write!(f, "\n{}", l)?;
        }
        Ok(())
    }
}
