//! Single-product market maker
//!
//! One tick: estimate fair, then either run the spike override or the
//! take → clear → make pipeline over a residual copy of the book.

use crate::fair_value::FairValueModel;
use crate::placement::{clear, make, take, MakeParams, TakeParams};
use crate::spike::TakeStyle;
use tracing::debug;
use trove_core::config::MarketMakingParams;
use trove_core::{Product, Strategy, TickContext};

#[derive(Debug, Clone, PartialEq)]
pub struct MarketMaker {
    product: Product,
    fair_value: FairValueModel,
    take: TakeParams,
    clear_width: f64,
    make: MakeParams,
    style: TakeStyle,
}

impl MarketMaker {
    pub fn new(params: &MarketMakingParams) -> Self {
        Self {
            product: params.product,
            fair_value: FairValueModel::from_params(params),
            take: TakeParams {
                take_width: params.take_width,
                prevent_adverse: params.prevent_adverse,
                adverse_volume: params.adverse_volume,
            },
            clear_width: params.clear_width,
            make: MakeParams {
                disregard_edge: params.disregard_edge,
                join_edge: params.join_edge,
                default_edge: params.default_edge,
                soft_position_limit: params.soft_position_limit,
            },
            style: TakeStyle::from(&params.take_style),
        }
    }

    pub fn product(&self) -> Product {
        self.product
    }
}

impl Strategy for MarketMaker {
    fn on_tick(&mut self, ctx: &mut TickContext<'_>) {
        let product = self.product;
        let Some(book) = ctx.book(product).cloned() else {
            debug!("{}: not in snapshot, skipping", product);
            return;
        };
        let Some(fair) = self.fair_value.estimate(product, ctx) else {
            debug!("{}: no fair value, skipping", product);
            return;
        };

        if let TakeStyle::SpikeAware(spike) = self.style {
            let reference = ctx.prior_price(product);
            let record = ctx.state.product_mut(product);
            if let Some(placement) = spike.check(product, fair, reference, record, book.clone(), &mut ctx.ledger) {
                ctx.extend_orders(placement.orders);
                return;
            }
        }

        let taken = take(product, fair, book, &mut ctx.ledger, &self.take);
        let cleared = clear(product, fair, self.clear_width, taken.book, &mut ctx.ledger);
        let made = make(product, fair, cleared.book, &mut ctx.ledger, &self.make);

        debug!(
            "{}: fair {:.2}, take {} clear {} make {}",
            product,
            fair,
            taken.orders.len(),
            cleared.orders.len(),
            made.orders.len()
        );
        ctx.extend_orders(taken.orders);
        ctx.extend_orders(cleared.orders);
        ctx.extend_orders(made.orders);
    }

    fn name(&self) -> &'static str {
        "MarketMaker"
    }
}
