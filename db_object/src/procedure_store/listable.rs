//! List verb and lazy traversal

use super::core::ProcedureStore;
use crate::contract::{PaginationStrategy, LIMIT_KEY};
use crate::errors::{ConfigurationError, ProcedureError, RestrictionError};
use crate::kwargs::{to_kwargs, Kwargs};
use crate::pagination::{InfiniteScroll, OffsetPagination, Page, PaginationCursor};
use crate::params::Verb;
use crate::traits::capabilities::Listable;
use crate::traits::entity::Entity;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use serde::Serialize;
use serde_json::Value;

/// Traversal state carried between pages of `yield_all`
struct Traversal {
    kwargs: Kwargs,
    previous_after: Option<Value>,
}

type TraversalState = Option<Result<Traversal, ProcedureError>>;

impl<T: Listable> ProcedureStore<T> {
    /// Fetch one page through `<T>_list`
    pub async fn list<K: Serialize>(&self, kwargs: K) -> Result<Page<T>, ProcedureError> {
        let kwargs = to_kwargs(T::NAME, kwargs)?;
        self.list_kwargs(&kwargs).await
    }

    /// Lazily walk every page, yielding entities one at a time.
    ///
    /// A page is only requested once the previous one has been consumed.
    /// The traversal stops when a page reports `has_more == false`.
    pub fn yield_all<'a, K: Serialize>(&'a self, kwargs: K) -> BoxStream<'a, Result<T, ProcedureError>> {
        let start: TraversalState = Some(to_kwargs(T::NAME, kwargs).map(|kwargs| Traversal {
            kwargs,
            previous_after: None,
        }));

        stream::try_unfold(start, move |state| self.next_page(state))
            .map_ok(|data| stream::iter(data.into_iter().map(Ok::<T, ProcedureError>)))
            .try_flatten()
            .boxed()
    }

    async fn next_page(&self, state: TraversalState) -> Result<Option<(Vec<T>, TraversalState)>, ProcedureError> {
        let mut traversal = match state {
            Some(traversal) => traversal?,
            None => return Ok(None),
        };

        let page = self.list_kwargs(&traversal.kwargs).await?;
        if !page.has_more() {
            return Ok(Some((page.data, None)));
        }

        let after = page.after();
        if traversal.previous_after.as_ref() == Some(&after) {
            tracing::warn!(
                "[LIST] {} returned the cursor {} twice; the procedure may not advance",
                T::NAME,
                after
            );
        }
        traversal
            .kwargs
            .insert(page.pagination.cursor_key().to_string(), after.clone());
        traversal.previous_after = Some(after);
        Ok(Some((page.data, Some(Ok(traversal)))))
    }

    async fn list_kwargs(&self, kwargs: &Kwargs) -> Result<Page<T>, ProcedureError> {
        match self.contract.pagination() {
            Some(PaginationStrategy::Offset) => self.list_offset(kwargs).await,
            Some(PaginationStrategy::Cursor { to_after }) => self.list_cursor(kwargs, to_after).await,
            None => Err(ConfigurationError::UndeclaredVerb {
                entity: T::NAME.to_string(),
                verb: Verb::List.to_string(),
            }
            .into()),
        }
    }

    async fn list_offset(&self, kwargs: &Kwargs) -> Result<Page<T>, ProcedureError> {
        let call = self.prepare(Verb::List, kwargs)?;
        let mut sets = self.execute(&call).await?;
        let data = sets
            .data()
            .iter()
            .map(T::from_row)
            .collect::<Result<Vec<_>, _>>()?;

        if !sets.next_set() {
            return Err(self.integration_error(&call, "pagination result set required"));
        }
        let pagination = match sets.data() {
            [row] => OffsetPagination::from_row(row)?,
            rows => {
                return Err(self.integration_error(
                    &call,
                    format!("exactly one pagination row required, got {}", rows.len()),
                ))
            }
        };
        Ok(Page::new(data, pagination))
    }

    async fn list_cursor(&self, kwargs: &Kwargs, to_after: fn(&T) -> Value) -> Result<Page<T>, ProcedureError> {
        let mut call = self.prepare(Verb::List, kwargs)?;
        let limit = bump_limit(&mut call.args).map_err(|e| ProcedureError::validation(T::NAME, LIMIT_KEY, e))?;

        let sets = self.execute(&call).await?;
        let rows = sets.data();
        let has_more = rows.len() > limit;
        let data = rows
            .iter()
            .take(limit)
            .map(T::from_row)
            .collect::<Result<Vec<_>, _>>()?;

        let after = if has_more { data.last().map(to_after) } else { None };
        let pagination = InfiniteScroll::new(after, has_more)
            .map_err(|e| ProcedureError::validation(T::NAME, "after", e))?;
        Ok(Page::new(data, pagination))
    }
}

/// Request one row beyond `limit` to learn whether more pages exist.
/// Returns the caller's limit.
fn bump_limit(args: &mut [(String, Value)]) -> Result<usize, RestrictionError> {
    let value = args
        .iter_mut()
        .find(|(name, _)| name == LIMIT_KEY)
        .map(|(_, value)| value)
        .ok_or_else(|| RestrictionError::new("limit is required"))?;

    let limit = value
        .as_u64()
        .filter(|limit| *limit >= 1)
        .ok_or_else(|| RestrictionError::new(format!("limit must be an integer >= 1, got {}", value)))?;
    let requested = limit
        .checked_add(1)
        .ok_or_else(|| RestrictionError::new(format!("limit {} is too large", limit)))?;
    let kept = usize::try_from(limit).map_err(|_| RestrictionError::new(format!("limit {} is too large", limit)))?;
    *value = Value::from(requested);
    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bump_limit() {
        let mut args = vec![("after".to_string(), json!(0)), ("limit".to_string(), json!(5))];
        assert_eq!(bump_limit(&mut args).unwrap(), 5);
        assert_eq!(args[1].1, json!(6));

        let mut zero = vec![("limit".to_string(), json!(0))];
        assert!(bump_limit(&mut zero).is_err());

        let mut text = vec![("limit".to_string(), json!("5"))];
        assert!(bump_limit(&mut text).is_err());

        assert!(bump_limit(&mut []).is_err());
    }

    #[test]
    fn test_bump_limit_rejects_overflow() {
        let mut args = vec![("limit".to_string(), json!(u64::MAX))];
        let err = bump_limit(&mut args).unwrap_err();
        assert!(err.to_string().contains("too large"));
        assert_eq!(args[0].1, json!(u64::MAX));
    }
}
