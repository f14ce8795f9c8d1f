use serde::Serialize;
use tracing::warn;

use crate::vendor::zapper::{App, AppId, Zapper};
use crate::vendor::zerion::{Position, PositionType, Protocol, Zerion};

/// Render-ready merge of both vendor responses. Every field is optional:
/// an absent field means its upstream failed or yielded no match, and the
/// page simply skips that section.
#[derive(Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ViewModel {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_items: Option<Vec<Position>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uniswap_items: Option<Vec<Position>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bancor_items: Option<Vec<Position>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balancer: Option<App>,
}

#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    zerion: Zerion,
    zapper: Zapper,
}

impl Aggregator {
    pub fn new(zerion: Zerion, zapper: Zapper) -> Self {
        Self { zerion, zapper }
    }

    /// Fetch both vendors concurrently and merge whatever succeeded.
    /// Neither branch cancels or fails the other; both outcomes are
    /// observed once both requests have settled. An empty view model is a
    /// valid result when both upstreams are down.
    pub async fn fetch(&self, wallet: &str) -> ViewModel {
        let (positions, apps) = futures::join!(
            self.zerion.positions(wallet),
            self.zapper.app_balances(wallet),
        );

        let mut view = ViewModel::default();

        match positions {
            Ok(Some(positions)) => {
                let (wallet_items, uniswap_items, bancor_items) =
                    filter_positions(positions.data);
                view.wallet_items = Some(wallet_items);
                view.uniswap_items = Some(uniswap_items);
                view.bancor_items = Some(bancor_items);
            }
            Ok(None) => {
                warn!("wallet {} not found on zerion", wallet);
            }
            Err(err) => {
                warn!("zerion positions request failed : {:#}", err);
            }
        }

        match apps {
            Ok(apps) => view.balancer = select_app(apps, AppId::BalancerV2),
            Err(err) => {
                warn!("zapper balances request failed : {:#}", err);
            }
        }

        view
    }
}

/// Three independent predicate passes over the same list, preserving input
/// order. The passes are not a partition: an item matching none of them is
/// dropped from all three views.
pub fn filter_positions(
    positions: Vec<Position>,
) -> (Vec<Position>, Vec<Position>, Vec<Position>) {
    let wallet_items = positions
        .iter()
        .filter(|p| p.attributes.position_type == PositionType::Wallet)
        .cloned()
        .collect();
    let uniswap_items = positions
        .iter()
        .filter(|p| p.attributes.protocol == Some(Protocol::UniswapV3))
        .cloned()
        .collect();
    let bancor_items = positions
        .iter()
        .filter(|p| p.attributes.protocol == Some(Protocol::Bancor))
        .cloned()
        .collect();
    (wallet_items, uniswap_items, bancor_items)
}

/// First app matching `app_id`, if any.
pub fn select_app(apps: Vec<App>, app_id: AppId) -> Option<App> {
    apps.into_iter().find(|app| app.app_id == app_id)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::vendor::zapper::{Network, Product};

    fn position(id: &str, position_type: &str, protocol: Option<&str>) -> Position {
        serde_json::from_value(json!({
            "id": id,
            "attributes": {
                "protocol": protocol,
                "position_type": position_type,
                "quantity": { "int": "0", "decimals": 18, "float": 0.0 },
                "price": 1.0,
                "value": 1.0,
                "changes": null,
                "fungible_info": { "name": "Token", "symbol": "TKN", "icon": null }
            },
            "relationships": {
                "chain": { "data": { "id": "ethereum" } }
            }
        }))
        .unwrap()
    }

    fn app(app_id: &str, name: &str) -> App {
        serde_json::from_value(json!({
            "appId": app_id,
            "appName": name,
            "appImage": "https://cdn.example/app.png",
            "network": "ethereum",
            "balanceUSD": 1.0,
            "products": []
        }))
        .unwrap()
    }

    #[test]
    fn test_filters_are_order_preserving_subsets() {
        let positions = vec![
            position("a", "wallet", None),
            position("b", "deposit", Some("Uniswap V3")),
            position("c", "wallet", None),
            position("d", "staked", Some("Bancor")),
            position("e", "reward", Some("Uniswap V3")),
        ];

        let (wallet, uniswap, bancor) = filter_positions(positions);

        let ids = |items: &[Position]| {
            items.iter().map(|p| p.id.clone()).collect::<Vec<_>>()
        };
        assert_eq!(ids(&wallet), vec!["a", "c"]);
        assert_eq!(ids(&uniswap), vec!["b", "e"]);
        assert_eq!(ids(&bancor), vec!["d"]);
    }

    #[test]
    fn test_filters_drop_unmatched_items() {
        let positions = vec![position("a", "staked", None)];
        let (wallet, uniswap, bancor) = filter_positions(positions);
        assert!(wallet.is_empty());
        assert!(uniswap.is_empty());
        assert!(bancor.is_empty());
    }

    #[test]
    fn test_select_app_takes_first_match() {
        let apps = vec![
            app("lido", "Lido"),
            app("balancer-v2", "Balancer One"),
            app("balancer-v2", "Balancer Two"),
        ];
        let selected = select_app(apps, AppId::BalancerV2);
        assert_eq!(selected.unwrap().app_name, "Balancer One");
    }

    #[test]
    fn test_select_app_without_match() {
        let apps = vec![app("lido", "Lido")];
        assert!(select_app(apps, AppId::BalancerV2).is_none());
    }

    #[test]
    fn test_empty_view_model_serializes_without_fields() {
        let view = ViewModel::default();
        let json = serde_json::to_string(&view).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn test_view_model_keeps_only_populated_fields() {
        let view = ViewModel {
            balancer: Some(App {
                app_id: AppId::BalancerV2,
                app_name: "Balancer".to_string(),
                app_image: String::new(),
                network: Network::Ethereum,
                balance_usd: 0.0,
                products: Vec::<Product>::new(),
            }),
            ..Default::default()
        };
        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("balancer").is_some());
        assert!(json.get("walletItems").is_none());
    }
}
