// report.rs - Coverage summary for the console

use grime_engine::{Session, DIRTY_EPSILON};

pub fn print(session: &Session) {
    let mask = session.mask();
    let cells = mask.size() * mask.size();
    let pct = mask.inside_count() as f32 / cells.max(1) as f32 * 100.0;
    println!("    Silhouette: {:.1}% ({} of {} cells)", pct, mask.inside_count(), cells);

    let dirt = session.dirt();
    for (i, layer) in dirt.layer_configs().enumerate() {
        let target = session.config().targets.get(&layer.id).copied().unwrap_or(0.0);
        println!(
            "    Layer {:<8} target {:>5.1}%  dirty {:>5.1}%",
            layer.id,
            target * 100.0,
            dirt.layer_dirty_ratio(i, DIRTY_EPSILON) * 100.0
        );
    }
    println!("    Union dirty: {:.1}%", dirt.union_dirty_ratio(DIRTY_EPSILON) * 100.0);
}
