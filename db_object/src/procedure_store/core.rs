use crate::contract::CompiledContract;
use crate::errors::ProcedureError;
use crate::kwargs::Kwargs;
use crate::params::Verb;
use crate::traits::entity::Entity;
use crate::traits::executor::{ProcedureCall, ProcedureExecutor, ResultSets};
use std::sync::Arc;

/// Procedure-backed store for one entity type.
///
/// Built only from a contract that passed every registration check; the
/// verbs available depend on the capabilities `T` implements.
pub struct ProcedureStore<T: Entity> {
    pub(crate) executor: Arc<dyn ProcedureExecutor>,
    pub(crate) contract: Arc<CompiledContract<T>>,
}

impl<T: Entity> Clone for ProcedureStore<T> {
    fn clone(&self) -> Self {
        Self {
            executor: Arc::clone(&self.executor),
            contract: Arc::clone(&self.contract),
        }
    }
}

impl<T: Entity> std::fmt::Debug for ProcedureStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcedureStore")
            .field("entity", &T::NAME)
            .field("database", &T::DATABASE)
            .field("contract", &self.contract)
            .finish()
    }
}

impl<T: Entity> ProcedureStore<T> {
    /// Compile `T`'s contract and bind it to an executor
    pub fn new(executor: Arc<dyn ProcedureExecutor>) -> Result<Self, ProcedureError> {
        let contract = T::contract().compile()?;
        Ok(Self {
            executor,
            contract: Arc::new(contract),
        })
    }

    pub fn contract(&self) -> &CompiledContract<T> {
        &self.contract
    }

    /// Validate `kwargs` against the verb's parameter set and build the call.
    ///
    /// Runs entirely before I/O.
    pub(crate) fn prepare(&self, verb: Verb, kwargs: &Kwargs) -> Result<ProcedureCall, ProcedureError> {
        let params = self.contract.params(verb)?;
        let args = self.contract.validator().validate(params, kwargs)?;
        Ok(ProcedureCall::new(
            T::DATABASE,
            params.procedure_name(T::NAME, verb),
            args,
        ))
    }

    pub(crate) async fn execute(&self, call: &ProcedureCall) -> Result<ResultSets, ProcedureError> {
        tracing::debug!(
            "[CALL] `{}`.`{}` with {} arg(s), rollback={}",
            call.database,
            call.procedure,
            call.args.len(),
            call.rollback
        );
        let sets = self.executor.execute(call).await?;
        tracing::trace!(
            "[CALL] `{}`.`{}` returned {} result set(s)",
            call.database,
            call.procedure,
            sets.len()
        );
        Ok(sets)
    }

    pub(crate) fn integration_error(&self, call: &ProcedureCall, message: impl Into<String>) -> ProcedureError {
        ProcedureError::integration(T::NAME, &call.procedure, message)
    }
}
