use crate::config::{ModelConfig, ModelType};
use crate::models::cluster_trait::ClusterModel;
use crate::models::kmeans::KMeans;
use crate::models::minibatch::MiniBatchKMeans;

/// Build an unfit clustering model with `n_clusters` clusters from a
/// `ModelConfig`.
pub fn build_model(config: &ModelConfig, n_clusters: usize) -> Box<dyn ClusterModel> {
    match config.model_type {
        ModelType::MiniBatchKMeans {
            batch_size,
            max_iter,
            max_no_improvement,
            n_init,
            tol,
        } => Box::new(
            MiniBatchKMeans::new(n_clusters, batch_size)
                .with_max_iter(max_iter)
                .with_max_no_improvement(max_no_improvement)
                .with_n_init(n_init)
                .with_tol(tol)
                .with_random_state(config.random_state),
        ),
        ModelType::KMeans {
            max_iter,
            n_init,
            tol,
        } => Box::new(
            KMeans::new(n_clusters)
                .with_max_iter(max_iter)
                .with_n_init(n_init)
                .with_tol(tol)
                .with_random_state(config.random_state),
        ),
    }
}
