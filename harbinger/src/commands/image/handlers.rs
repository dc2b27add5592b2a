use super::*;
use crate::context::{AppContext, VerbosityLevel};
use crate::format;
use libharbinger::GrpcImageService;

/// Open an inventory client for the resolved authority, or exit.
fn connect(ctx: &AppContext, grpc_authority: Option<&str>) -> Inventory<GrpcImageService> {
    let authority = ctx.grpc_authority(grpc_authority);
    format::print(
        ctx,
        VerbosityLevel::Verbose,
        &format!("Using inventory service at {}", authority),
    );

    match GrpcImageService::connect(authority) {
        Ok(service) => Inventory::new(service),
        Err(e) => {
            format::error(ctx, &e.to_string());
            std::process::exit(1);
        }
    }
}

fn finish(ctx: &AppContext, result: Result<(), String>) {
    if let Err(e) = result {
        format::error(ctx, &e);
        std::process::exit(1);
    }
}

/// Handle the image list command
pub async fn handle_image_list(ctx: &AppContext, raw: bool, grpc_authority: Option<&str>) {
    let inventory = connect(ctx, grpc_authority);
    let mut stdout = io::stdout();
    let result = run_image_list(&inventory, raw, &mut stdout).await;
    finish(ctx, result);
}

/// Handle the image inspect command
pub async fn handle_image_inspect(
    ctx: &AppContext,
    image: &str,
    raw: bool,
    grpc_authority: Option<&str>,
) {
    let inventory = connect(ctx, grpc_authority);
    let mut stdout = io::stdout();
    let result = run_image_inspect(&inventory, image, raw, &mut stdout).await;
    finish(ctx, result);
}

/// Handle the image remove command
pub async fn handle_image_remove(ctx: &AppContext, image: &str, grpc_authority: Option<&str>) {
    let inventory = connect(ctx, grpc_authority);
    let mut stdout = io::stdout();
    let result = run_image_remove(&inventory, image, &mut stdout).await;
    finish(ctx, result);
}

/// Handle the image prune command
pub async fn handle_image_prune(ctx: &AppContext, force: bool, grpc_authority: Option<&str>) {
    let inventory = connect(ctx, grpc_authority);

    let confirm = || {
        let mut stdin = io::stdin().lock();
        let mut stderr = io::stderr();
        prompt_confirm(&mut stdin, &mut stderr, PRUNE_ALL_WARNING)
    };

    let mut stdout = io::stdout();
    let result = run_image_prune(&inventory, force, confirm, &mut stdout).await;
    finish(ctx, result);
}
