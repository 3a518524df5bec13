use crate::domain::fog_system_model::topology::{Position, distance};

/// Physical constants of the wireless link between a fog node and its clients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelParams {
    /// Transmit power in watts.
    pub transmit_power: f64,
    /// Thermal noise power in watts.
    pub noise_power: f64,
    pub path_loss_exponent: f64,
    /// De-rating applied to co-channel interference relative to the signal term.
    pub interference_factor: f64,
    /// Bandwidth of one resource block in kHz.
    pub block_bandwidth_khz: f64,
    /// Distances below this are treated as this, keeping the gain finite.
    pub min_distance: f64,
}

impl Default for ChannelParams {
    fn default() -> Self {
        Self {
            transmit_power: 0.2,
            noise_power: 1e-13,
            path_loss_exponent: 3.0,
            interference_factor: 0.01,
            block_bandwidth_khz: 180.0,
            min_distance: 1.0,
        }
    }
}

/// SINR based channel of a single fog node.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SinrChannel {
    params: ChannelParams,
}

impl SinrChannel {
    pub fn new(params: ChannelParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ChannelParams {
        &self.params
    }

    /// Inverse-distance path loss.
    pub fn channel_gain(&self, distance: f64) -> f64 {
        distance.max(self.params.min_distance).powf(-self.params.path_loss_exponent)
    }

    pub fn received_power(&self, node: Position, client: Position) -> f64 {
        self.params.transmit_power * self.channel_gain(distance(node, client))
    }

    /// SINR of `client` at a node located at `node` while every position in `interferers`
    /// is served by the same node.
    pub fn sinr<I>(&self, node: Position, client: Position, interferers: I) -> f64
    where
        I: IntoIterator<Item = Position>,
    {
        let signal = self.received_power(node, client);
        let interference: f64 = interferers.into_iter().map(|p| self.received_power(node, p)).sum();

        signal / (self.params.interference_factor * interference + self.params.noise_power)
    }

    /// `log2(1 + SINR)` in bit/s/Hz, rounded to three decimals.
    pub fn spectral_efficiency(&self, sinr: f64) -> f64 {
        if !sinr.is_finite() || sinr <= 0.0 {
            return 0.0;
        }
        ((1.0 + sinr).log2() * 1000.0).round() / 1000.0
    }

    /// Resource blocks needed to carry `requested_rate` Mbit/s at the given SINR.
    ///
    /// Returns `capacity` when the spectral efficiency rounds to zero so that the request
    /// cannot fit anywhere.
    pub fn resource_blocks(&self, sinr: f64, requested_rate: f64, capacity: i64) -> i64 {
        let efficiency = self.spectral_efficiency(sinr);
        if efficiency <= 0.0 {
            return capacity;
        }

        let blocks = (requested_rate * 1000.0 / (self.params.block_bandwidth_khz * efficiency)).floor();
        (blocks as i64).max(1)
    }
}
