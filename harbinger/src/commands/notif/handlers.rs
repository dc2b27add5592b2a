use super::*;
use crate::context::AppContext;
use crate::format;
use libharbinger::Notif;

/// Handle the notif list command
pub fn handle_notif_list(ctx: &AppContext) {
    let notif = Notif::from_config(&ctx.config.notif);
    println!("{}", render_notifier_names(&notif.names()));
}

/// Handle the notif test command
pub async fn handle_notif_test(ctx: &AppContext) {
    let notif = Notif::from_config(&ctx.config.notif);
    if notif.is_empty() {
        format::error(ctx, "No notifier configured");
        std::process::exit(1);
    }

    let deliveries = notif.send_all(&sample_event()).await;
    for delivery in &deliveries {
        if delivery.result.is_ok() {
            format::success(ctx, &describe_delivery(delivery));
        } else {
            format::error(ctx, &describe_delivery(delivery));
        }
    }

    if deliveries_outcome(&deliveries).is_err() {
        std::process::exit(1);
    }
}
