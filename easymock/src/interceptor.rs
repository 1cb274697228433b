// vim: tw=80
//! The registry and dispatch core.
//!
//! An [`Interceptor`] knows every operation of one mock object.  For each it
//! keeps the configured [`CallRecord`]s, an implicit record that counts calls
//! no setup accepted, and a ledger of every live call with its arguments.
//! The ledger is what verification reads, so a wildcard verification sees
//! every call to the operation regardless of which setup answered it.

use dashmap::{DashMap, mapref::entry::Entry};
use std::{
    any,
    borrow::Cow,
    fmt::{self, Display},
    panic,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering}
    }
};
use tracing::{debug, trace};

use crate::{
    arguments::Arguments,
    error::{MockError, Result},
    matcher::ArgMatcher,
    record::{CallRecord, Outcome, RecordId, Reply},
    signature::OperationSignature
};

/// Whether an operation can be intercepted at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Interception {
    Intercepted,
    /// The proxy forwards this operation to its real body.  It can be neither
    /// set up nor verified.
    Sealed
}

/// What a mock does with a call that no setup accepts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MockBehavior {
    /// Return the zero value of the return type.
    #[default]
    Loose,
    /// Fail the call with [`MockError::NoSetup`].
    Strict
}

/// One live call, as kept in an operation's ledger.
#[derive(Debug)]
pub struct Invocation {
    record: RecordId,
    arguments: Arguments
}

impl Invocation {
    /// The record that answered the call.  For calls no setup accepted, this
    /// is the operation's implicit record.
    pub fn record(&self) -> RecordId {
        self.record
    }

    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    /// Would a call with these arguments satisfy every matcher?
    pub fn satisfies(&self, matchers: &[ArgMatcher]) -> bool {
        matchers.len() == self.arguments.len() &&
            matchers.iter()
                .zip(self.arguments.iter())
                .all(|(m, a)| m.matches(a))
    }
}

impl Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({})", self.arguments)
    }
}

struct Operation {
    interception: Interception,
    implicit: Arc<CallRecord>,
    /// In registration order
    records: Vec<Arc<CallRecord>>,
    ledger: Vec<Arc<Invocation>>
}

/// Registry of configured behavior for one mock object.
///
/// All methods take `&self` and may be called concurrently.  Counters are
/// atomic and the registry is a concurrent map, so no call is ever lost.
pub struct Interceptor {
    name: Cow<'static, str>,
    behavior: MockBehavior,
    next_id: AtomicU64,
    operations: DashMap<OperationSignature, Operation>,
    records: DashMap<RecordId, Arc<CallRecord>>
}

impl Interceptor {
    /// Create an empty interceptor.  `name` is the context used in messages,
    /// usually the mock type's name.
    pub fn new<N: Into<Cow<'static, str>>>(name: N) -> Self {
        Interceptor {
            name: name.into(),
            behavior: MockBehavior::default(),
            next_id: AtomicU64::new(0),
            operations: DashMap::new(),
            records: DashMap::new()
        }
    }

    pub fn with_behavior(mut self, behavior: MockBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn behavior(&self) -> MockBehavior {
        self.behavior
    }

    fn new_record(&self, signature: OperationSignature,
                  matchers: Vec<ArgMatcher>, outcome: Outcome,
                  replaces: Option<RecordId>)
        -> Arc<CallRecord>
    {
        let id = RecordId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let record = Arc::new(CallRecord::new(id, signature, matchers, outcome)
                              .replacing(replaces));
        self.records.insert(id, record.clone());
        record
    }

    fn new_operation(&self, signature: &OperationSignature,
                     interception: Interception) -> Operation
    {
        let matchers = signature.params()
            .iter()
            .map(|p| ArgMatcher::any_of_type(*p))
            .collect();
        let implicit = self.new_record(signature.clone(), matchers,
                                       Outcome::Unconfigured, None);
        Operation {
            interception,
            implicit,
            records: Vec::new(),
            ledger: Vec::new()
        }
    }

    /// Make an operation known to the interceptor.
    ///
    /// The proxy declares every operation of its contract up front.
    /// Declaring an operation twice only updates its interception.
    pub fn declare(&self, signature: OperationSignature,
                   interception: Interception)
    {
        debug!(mock = %self.name, operation = %signature, ?interception,
               "declared operation");
        match self.operations.entry(signature) {
            Entry::Occupied(mut e) => e.get_mut().interception = interception,
            Entry::Vacant(e) => {
                let op = self.new_operation(e.key(), interception);
                e.insert(op);
            }
        }
    }

    pub fn is_declared(&self, signature: &OperationSignature) -> bool {
        self.operations.contains_key(signature)
    }

    pub fn interception(&self, signature: &OperationSignature)
        -> Result<Interception>
    {
        self.operations.get(signature)
            .map(|op| op.interception)
            .ok_or_else(|| unknown(signature))
    }

    /// Every declared operation, sorted by name
    pub fn operations(&self) -> Vec<OperationSignature> {
        let mut sigs = self.operations.iter()
            .map(|e| e.key().clone())
            .collect::<Vec<_>>();
        sigs.sort_by(|a, b| a.name().cmp(b.name())
                     .then_with(|| a.to_string().cmp(&b.to_string())));
        sigs
    }

    /// Add a configured behavior.
    ///
    /// Nothing is replaced: a later registration that accepts the same call
    /// shadows the earlier one during [`resolve`](#method.resolve).  An
    /// undeclared operation is declared as intercepted.
    ///
    /// Fails only if the matchers don't line up with the signature's
    /// parameters.
    pub fn register(&self, signature: OperationSignature,
                    matchers: Vec<ArgMatcher>, outcome: Outcome)
        -> Result<Arc<CallRecord>>
    {
        check_matchers(&signature, &matchers)?;
        Ok(self.insert_record(signature, matchers, outcome, None))
    }

    /// Register without validating the matchers.  For callers that already
    /// did.
    pub(crate) fn insert_record(&self, signature: OperationSignature,
                                matchers: Vec<ArgMatcher>, outcome: Outcome,
                                replaces: Option<RecordId>)
        -> Arc<CallRecord>
    {
        let record = self.new_record(signature.clone(), matchers, outcome,
                                     replaces);
        debug!(mock = %self.name, operation = %signature, record = %record.id(),
               outcome = ?record.outcome(), "registered setup");
        let key = signature.clone();
        self.operations.entry(signature)
            .or_insert_with(|| {
                self.new_operation(&key, Interception::Intercepted)
            })
            .records
            .push(record.clone());
        record
    }

    /// Find the configured record that answers a live call.
    ///
    /// The most recently registered record whose matchers all accept `args`
    /// wins.  `Ok(None)` means the operation is known but nothing was set up
    /// for these arguments.
    ///
    /// # Panics
    ///
    /// A panic inside a predicate matcher propagates unchanged.  No lock is
    /// held while matchers run.
    pub fn resolve(&self, signature: &OperationSignature, args: &Arguments)
        -> Result<Option<Arc<CallRecord>>>
    {
        Ok(self.records_for(signature)?
            .into_iter()
            .rev()
            .find(|r| r.matches(args)))
    }

    /// Every configured record of an operation, in registration order.
    pub fn records_for(&self, signature: &OperationSignature)
        -> Result<Vec<Arc<CallRecord>>>
    {
        self.operations.get(signature)
            .map(|op| op.records.clone())
            .ok_or_else(|| unknown(signature))
    }

    /// The record that counts an operation's calls no setup accepted.
    pub fn implicit_record(&self, signature: &OperationSignature)
        -> Result<Arc<CallRecord>>
    {
        self.operations.get(signature)
            .map(|op| op.implicit.clone())
            .ok_or_else(|| unknown(signature))
    }

    pub fn record(&self, id: RecordId) -> Result<Arc<CallRecord>> {
        self.records.get(&id)
            .map(|r| r.value().clone())
            .ok_or(MockError::UnknownRecord(id))
    }

    /// Count one call against a record.  Returns the record's new count.
    pub fn record_invocation(&self, id: RecordId) -> Result<usize> {
        Ok(self.record(id)?.record_invocation())
    }

    /// Handle one live call: resolve it, count it, log it in the ledger and
    /// produce its reply.
    ///
    /// A strict interceptor counts and logs an unmatched call before failing
    /// it with [`MockError::NoSetup`], so it still shows up in verification.
    pub fn intercept(&self, signature: &OperationSignature, args: Arguments)
        -> Result<Reply>
    {
        let resolved = self.resolve(signature, &args)?;
        let no_setup = match (&resolved, self.behavior) {
            (None, MockBehavior::Strict) => {
                Some(self.no_setup(signature, &args)?)
            },
            _ => None
        };
        let record = match resolved {
            Some(r) => r,
            None => self.implicit_record(signature)?
        };
        self.record_invocation(record.id())?;
        trace!(mock = %self.name, operation = %signature, record = %record.id(),
               args = %args, "intercepted call");
        self.operations.get_mut(signature)
            .ok_or_else(|| unknown(signature))?
            .ledger
            .push(Arc::new(Invocation{record: record.id(), arguments: args}));
        match no_setup {
            Some(e) => Err(e),
            None => Ok(record.outcome().reply())
        }
    }

    fn no_setup(&self, signature: &OperationSignature, args: &Arguments)
        -> Result<MockError>
    {
        let records = self.records_for(signature)?;
        let details = if records.is_empty() {
            "\nNo setups are configured for this operation.".to_owned()
        } else {
            let mut s = String::from("\nConfigured setups:");
            for r in records.iter() {
                let why = r.explain(args).unwrap_or_default();
                s.push_str(&format!("\n  {}: {}", r.expression(), why));
            }
            s
        };
        Ok(MockError::NoSetup {
            context: self.name.to_string(),
            call: format!("{}({})", signature.name(), args),
            details
        })
    }

    /// Every live call of an operation, oldest first.
    pub fn invocations(&self, signature: &OperationSignature)
        -> Result<Vec<Arc<Invocation>>>
    {
        self.operations.get(signature)
            .map(|op| op.ledger.clone())
            .ok_or_else(|| unknown(signature))
    }

    /// How many live calls of an operation satisfied `matchers`?
    ///
    /// Reads the ledger, not the per-record counters, so the answer covers
    /// every call whether it was answered by a setup, by a different setup, or
    /// by no setup at all.
    pub fn lookup_for_verification(&self, signature: &OperationSignature,
                                   matchers: &[ArgMatcher]) -> Result<usize>
    {
        check_matchers(signature, matchers)?;
        Ok(self.invocations(signature)?
            .iter()
            .filter(|i| i.satisfies(matchers))
            .count())
    }

    /// Dispatch a live call to an operation returning `R`.
    ///
    /// This is the entry point for generated proxies.
    ///
    /// # Panics
    ///
    /// * With the configured error object, unchanged, if the matching setup
    ///   throws.
    /// * With the error's message on any engine error, including a strict
    ///   mock's unmatched call.  Those indicate a broken test or proxy.
    pub fn dispatch<R: Default + 'static>(&self,
                                           signature: &OperationSignature,
                                           args: Arguments) -> R
    {
        match self.intercept(signature, args) {
            Ok(Reply::Return(v)) => downcast_return(signature, v),
            Ok(Reply::Throw(e)) => panic::resume_unwind(e),
            Ok(Reply::Default) => R::default(),
            Err(e) => panic!("{}", e)
        }
    }

    /// Like [`dispatch`](#method.dispatch), for operations returning
    /// `Result<T, E>`.
    ///
    /// A configured error of type `E` is returned as `Err`.  Any other
    /// configured error is raised as in `dispatch`.  An unconfigured call
    /// returns `Ok(T::default())`.
    pub fn dispatch_fallible<T, E>(&self, signature: &OperationSignature,
                                   args: Arguments)
        -> std::result::Result<T, E>
        where T: Default + 'static, E: 'static
    {
        match self.intercept(signature, args) {
            Ok(Reply::Return(v)) => downcast_return(signature, v),
            Ok(Reply::Throw(e)) => match e.downcast::<E>() {
                Ok(e) => Err(*e),
                Err(e) => panic::resume_unwind(e)
            },
            Ok(Reply::Default) => Ok(T::default()),
            Err(e) => panic!("{}", e)
        }
    }
}

impl fmt::Debug for Interceptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Interceptor")
            .field("name", &self.name)
            .field("behavior", &self.behavior)
            .field("operations", &self.operations.len())
            .field("records", &self.records.len())
            .finish()
    }
}

fn unknown(signature: &OperationSignature) -> MockError {
    MockError::UnknownOperation { signature: signature.to_string() }
}

fn downcast_return<R: 'static>(signature: &OperationSignature,
                               v: Box<dyn any::Any>) -> R
{
    match v.downcast::<R>() {
        Ok(r) => *r,
        Err(_) => panic!("{}: configured return value is not a {}",
                         signature, any::type_name::<R>())
    }
}

pub(crate) fn check_matchers(signature: &OperationSignature,
                             matchers: &[ArgMatcher]) -> Result<()>
{
    if matchers.len() != signature.arity() {
        return Err(MockError::ArityMismatch {
            signature: signature.to_string(),
            expected: signature.arity(),
            actual: matchers.len()
        });
    }
    for (index, (m, p)) in matchers.iter()
        .zip(signature.params())
        .enumerate()
    {
        if m.param() != *p {
            return Err(MockError::MatcherTypeMismatch {
                signature: signature.to_string(),
                index,
                matcher: m.param().name(),
                parameter: p.name()
            });
        }
    }
    Ok(())
}
