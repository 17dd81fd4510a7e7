//! Code probing loop.

use autodominos_core::WorkingCode;
use futures::stream::{self, Stream};

use crate::error::DominosError;
use crate::session::{CodeOutcome, OrderSession};

/// Probes `codes` in order and yields a [`WorkingCode`] for every code that
/// unlocks a promotion not recorded before.
///
/// The stream is lazy and single-pass: each element costs network round
/// trips that change session state, and codes are only probed as the stream
/// is polled. Dropping it early leaves the remaining codes unprobed. The
/// first error is yielded once and ends the stream.
pub fn probe_codes<'a, I>(
    session: &'a mut OrderSession,
    codes: I,
) -> impl Stream<Item = Result<WorkingCode, DominosError>> + 'a
where
    I: IntoIterator<Item = String>,
    I::IntoIter: 'a,
{
    stream::unfold(Some((session, codes.into_iter())), |state| async move {
        let (session, mut codes) = state?;
        loop {
            let code = codes.next()?;
            match session.check_code(&code).await {
                Ok(CodeOutcome::NewPromotion(promotion)) => {
                    let working = WorkingCode::new(code, promotion);
                    return Some((Ok(working), Some((session, codes))));
                }
                Ok(CodeOutcome::Rejected | CodeOutcome::NoNewPromotion) => {}
                Err(err) => {
                    tracing::error!(code = %code, error = %err, "probing aborted");
                    return Some((Err(err), None));
                }
            }
        }
    })
}
