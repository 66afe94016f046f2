use std::time::Instant;

use candle_core::{Device, Tensor};
use candle_nn::{loss, AdamW, Module, Optimizer, ParamsAdamW, VarMap};
use log::debug;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use super::mcep_nn::McepMlp;
use crate::{
    config::FitConfig,
    constants::{ELAPSED_MARKER, RETRAIN_COMPONENT},
    error::Result,
    progress::format_elapsed,
};

/// Minimizes the mean squared error between the model output and the labels
/// using Adam over shuffled mini batches. One log line is emitted per epoch.
pub(super) fn training_loop(
    model: &McepMlp,
    var_map: &VarMap,
    train_features: &Tensor,
    train_labels: &Tensor,
    args: &FitConfig,
    on_log: &mut dyn FnMut(&str),
) -> Result<()> {
    let num_frames = train_features.dim(0)?;
    let batch_size = args.batch_size.clamp(1, num_frames.max(1));
    let mut optimizer = AdamW::new(
        var_map.all_vars(),
        ParamsAdamW {
            lr: args.learning_rate,
            weight_decay: 0.,
            ..Default::default()
        },
    )?;
    let mut rng = StdRng::seed_from_u64(args.seed);
    let mut indices: Vec<u32> = (0..num_frames as u32).collect();
    for epoch in 1..=args.epochs {
        let started = Instant::now();
        indices.shuffle(&mut rng);
        let mut loss_sum = 0f32;
        let mut batches = 0usize;
        for chunk in indices.chunks(batch_size) {
            let batch_index = Tensor::from_slice(chunk, chunk.len(), &Device::Cpu)?;
            let xs = train_features.index_select(&batch_index, 0)?;
            let ys = train_labels.index_select(&batch_index, 0)?;
            let batch_loss = loss::mse(&model.forward(&xs)?, &ys)?;
            optimizer.backward_step(&batch_loss)?;
            loss_sum += batch_loss.to_scalar::<f32>()?;
            batches += 1;
        }
        let message = format!(
            "[Source={}] epoch {} train loss: {:8.5}. {} {}.",
            RETRAIN_COMPONENT,
            epoch,
            loss_sum / batches.max(1) as f32,
            ELAPSED_MARKER,
            format_elapsed(started.elapsed())
        );
        debug!("{}", message);
        on_log(&message);
    }
    Ok(())
}
