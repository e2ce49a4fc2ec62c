//! Cluster a synthetic click-stream and write an HTML report.
//!
//! Run with `RUST_LOG=info cargo run --example synthetic_sessions`.
use anyhow::Result;
use maud::html;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use navclust::clusterer::KMeansClusterer;
use navclust::preprocessing::{SessionFilter, SessionProcessor};
use navclust::report::plots::{plot_cluster_profiles, plot_cluster_sizes, plot_silhouette_sweep};
use navclust::report::{Report, ReportSection};
use navclust::vocabulary::Vocabulary;
use navclust::Session;

fn generate_sessions(n: usize, seed: u64) -> Vec<Session> {
    // frontpage readers, sports fans, news and business browsers
    let habits: [&[u32]; 4] = [&[1, 1, 2, 7], &[14, 15, 1, 14], &[2, 12, 9, 4], &[6, 11, 6, 16]];
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let habit = habits[rng.gen_range(0..habits.len())];
            let len = rng.gen_range(2..20);
            (0..len)
                .map(|_| {
                    if rng.gen_bool(0.1) {
                        rng.gen_range(1..=17)
                    } else {
                        habit[rng.gen_range(0..habit.len())]
                    }
                })
                .collect()
        })
        .collect()
}

fn main() -> Result<()> {
    env_logger::init();

    let sessions = generate_sessions(3000, 7);
    let mut processor = SessionProcessor::new(Vocabulary::msnbc());
    let x = processor.preprocess_sequences(&sessions, &SessionFilter::default())?;

    let mut clusterer = KMeansClusterer::minibatch(8, 256);
    let scores = clusterer.find_optimal_clusters(&x, 4..=8)?;
    clusterer.fit(&x)?;

    let centers = clusterer.get_cluster_centers()?;
    let labels = clusterer.training_labels()?;
    let evaluation = clusterer.evaluate_clustering(&x)?;
    println!(
        "{} clusters, silhouette {:.4}, sizes {:?}",
        evaluation.n_clusters, evaluation.silhouette, evaluation.cluster_sizes
    );

    let mut section = ReportSection::new("Synthetic sessions");
    section.add_content(html! {
        p { (x.nrows()) " sessions clustered into " (evaluation.n_clusters) " groups." }
    });
    let plots = [
        plot_silhouette_sweep(&scores),
        plot_cluster_profiles(centers, processor.vocabulary()),
        plot_cluster_sizes(labels, centers.nrows()),
    ];
    for plot in plots {
        section.add_plot(plot.map_err(anyhow::Error::msg)?);
    }

    let mut report = Report::new("Synthetic Session Clusters", env!("CARGO_PKG_VERSION"));
    report.add_section(section);
    report.save_to_file("synthetic_sessions_report.html")?;
    Ok(())
}
