use std::collections::HashMap;

use futures::future::BoxFuture;
use http::Method;
use tracing::debug;

use crate::{Context, Next, Result};

use super::Router;

/// Per-invocation dispatch state: the scan cursor plus the context snapshot
/// taken at entry. Created fresh for every `dispatch` call, so concurrent
/// requests sharing a router never share state.
struct DispatchFrame {
    cursor: usize,
    snapshot: Snapshot,
}

impl DispatchFrame {
    fn capture(ctx: &Context) -> Self {
        Self {
            cursor: 0,
            snapshot: Snapshot::capture(ctx),
        }
    }
}

/// The rewritable context fields as they stood when dispatch entered.
#[derive(Clone)]
struct Snapshot {
    path: String,
    base_path: String,
    params: HashMap<String, String>,
}

impl Snapshot {
    fn capture(ctx: &Context) -> Self {
        Self {
            path: ctx.path.clone(),
            base_path: ctx.base_path.clone(),
            params: ctx.params.clone(),
        }
    }

    fn restore(&self, ctx: &mut Context) {
        ctx.path = self.path.clone();
        ctx.base_path = self.base_path.clone();
        ctx.params = self.params.clone();
    }
}

impl Router {
    /// Dispatch a request through the stack.
    ///
    /// Scans layers in registration order, narrowing the path context for
    /// each accepted layer and handing it a continuation that restores the
    /// context and resumes the scan behind it. When the stack is exhausted
    /// the caller's `next` runs with the context restored; the snapshot is
    /// restored again once the scan completes, so the caller never observes
    /// this router's internal rewrites.
    pub async fn dispatch<'a>(&'a self, mut ctx: Context, next: Next<'a>) -> Result<Context> {
        ctx.capture_original_path();
        let frame = DispatchFrame::capture(&ctx);
        let snapshot = frame.snapshot.clone();
        let mut ctx = self.find_next(ctx, frame, next).await?;
        snapshot.restore(&mut ctx);
        Ok(ctx)
    }

    /// Scan `stack[frame.cursor..]` for the next acceptable layer and invoke
    /// it. Boxed: the continuation handed to an accepted layer recurses back
    /// into the scan.
    fn find_next<'a>(
        &'a self,
        mut ctx: Context,
        mut frame: DispatchFrame,
        next: Next<'a>,
    ) -> BoxFuture<'a, Result<Context>> {
        Box::pin(async move {
            loop {
                let layer = match self.stack.get(frame.cursor) {
                    Some(layer) => layer,
                    None => {
                        frame.snapshot.restore(&mut ctx);
                        return next.run(ctx).await;
                    }
                };
                frame.cursor += 1;

                let found = match layer.matches(&ctx.path) {
                    Some(found) => found,
                    None => continue,
                };

                if let Some(route) = layer.route() {
                    if !route.handles_method(&ctx.method) {
                        // the route is invisible for this method; it only
                        // contributes to the Allow union of an OPTIONS scan
                        if ctx.method == Method::OPTIONS {
                            let methods = route.allowed();
                            debug!(
                                path = %route.path(),
                                methods = ?methods,
                                "collecting allowed methods"
                            );
                            for method in methods {
                                ctx.allow(method);
                            }
                        }
                        continue;
                    }
                }

                debug!(layer = %layer.path(), path = %ctx.path, "layer accepted");

                let path_before = ctx.path.clone();
                if layer.route().is_none() {
                    // a prefix mount extends base_path by what its pattern
                    // actually matched; a route consumes the rest and
                    // extends nothing
                    let consumed = &path_before[..found.end_index];
                    if consumed != layer.path() {
                        debug!(
                            layer = %layer.path(),
                            consumed,
                            "mount pattern and matched prefix differ"
                        );
                    }
                    ctx.base_path.push_str(consumed);
                }

                let mut path = ctx
                    .original_path()
                    .get(ctx.base_path.len()..)
                    .unwrap_or_default()
                    .to_string();
                if path.is_empty() || !path.starts_with('/') {
                    path.insert(0, '/');
                }
                ctx.path = path;

                ctx.params = if self.options.merge_params {
                    let mut params = frame.snapshot.params.clone();
                    params.extend(found.params);
                    params
                } else {
                    found.params
                };

                let resume = Next::new(move |mut ctx: Context| {
                    ctx.path = path_before;
                    ctx.base_path = frame.snapshot.base_path.clone();
                    ctx.params = frame.snapshot.params.clone();
                    self.find_next(ctx, frame, next)
                });
                return layer.call(ctx, resume).await;
            }
        })
    }
}
